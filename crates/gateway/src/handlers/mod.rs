//! API handlers module

pub mod connections;
pub mod health;
pub mod search;
pub mod stats;
