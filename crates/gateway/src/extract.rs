//! Request extractors

use axum::extract::FromRequest;
use papergraph_common::errors::AppError;

/// JSON body whose rejections render as [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
