//! Paper and connection records shared by the graph store and the pipeline

use serde::{Deserialize, Serialize};

/// One article as stored in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Unique paper identifier
    pub paper_id: String,

    /// Paper title
    pub title: String,

    /// Publication year
    pub year: Option<i32>,

    /// Bibliographic citation text (BibTeX or free-form)
    pub bibtex: String,

    /// External link
    pub link: Option<String>,

    /// Stored embedding, absent for papers that were never embedded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl PaperRecord {
    /// Create a record with only an identifier and title
    pub fn new(paper_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            paper_id: paper_id.into(),
            title: title.into(),
            year: None,
            bibtex: String::new(),
            link: None,
            embedding: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_bibtex(mut self, bibtex: impl Into<String>) -> Self {
        self.bibtex = bibtex.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// A paper paired with its similarity to one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub paper: PaperRecord,

    /// Cosine similarity in [-1, 1]
    pub score: f64,
}

/// Raw relationship type between two papers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationKind {
    Cites,
    CitedBy,
    Related,
    Similar,
    Other(String),
}

impl RelationKind {
    /// Parse the relationship type name reported by the graph store
    pub fn parse(raw: &str) -> Self {
        match raw {
            "CITES" => RelationKind::Cites,
            "CITED_BY" => RelationKind::CitedBy,
            "RELATED" => RelationKind::Related,
            "SIMILAR" => RelationKind::Similar,
            other => RelationKind::Other(other.to_string()),
        }
    }

    /// Relationship type name as stored in the graph
    pub fn as_str(&self) -> &str {
        match self {
            RelationKind::Cites => "CITES",
            RelationKind::CitedBy => "CITED_BY",
            RelationKind::Related => "RELATED",
            RelationKind::Similar => "SIMILAR",
            RelationKind::Other(raw) => raw,
        }
    }

    /// Human-readable connection type
    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::Cites => "cites",
            RelationKind::CitedBy => "cited by",
            RelationKind::Related => "related to",
            RelationKind::Similar => "similar topic",
            RelationKind::Other(_) => "related",
        }
    }
}

impl From<String> for RelationKind {
    fn from(raw: String) -> Self {
        RelationKind::parse(&raw)
    }
}

impl From<RelationKind> for String {
    fn from(kind: RelationKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One edge found by a graph lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Neighboring paper identifier
    pub paper_id: String,

    /// Neighboring paper title
    pub title: String,

    /// Raw relationship type
    pub relationship_type: RelationKind,

    /// Display label derived from `relationship_type`
    pub connection_type: String,
}

impl ConnectionRecord {
    /// Build a record, deriving the display label from the relationship kind
    pub fn new(paper_id: impl Into<String>, title: impl Into<String>, kind: RelationKind) -> Self {
        let connection_type = kind.label().to_string();
        Self {
            paper_id: paper_id.into(),
            title: title.into(),
            relationship_type: kind,
            connection_type,
        }
    }
}

/// Corpus statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub paper_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_labels() {
        assert_eq!(RelationKind::parse("CITES").label(), "cites");
        assert_eq!(RelationKind::parse("CITED_BY").label(), "cited by");
        assert_eq!(RelationKind::parse("RELATED").label(), "related to");
        assert_eq!(RelationKind::parse("SIMILAR").label(), "similar topic");
        assert_eq!(RelationKind::parse("AUTHORED_WITH").label(), "related");
    }

    #[test]
    fn test_relation_kind_keeps_unknown_name() {
        let kind = RelationKind::parse("MENTIONS");
        assert_eq!(kind, RelationKind::Other("MENTIONS".to_string()));
        assert_eq!(kind.as_str(), "MENTIONS");
    }

    #[test]
    fn test_connection_record_serializes_raw_kind() {
        let record = ConnectionRecord::new("p-2", "Graph Attention Networks", RelationKind::Cites);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["relationship_type"], "CITES");
        assert_eq!(json["connection_type"], "cites");
    }

    #[test]
    fn test_paper_builder() {
        let paper = PaperRecord::new("p-1", "Semi-Supervised Classification with GCNs")
            .with_year(2017)
            .with_link("https://arxiv.org/abs/1609.02907");

        assert_eq!(paper.year, Some(2017));
        assert!(paper.embedding.is_none());

        let json = serde_json::to_value(&paper).unwrap();
        assert!(json.get("embedding").is_none());
    }
}
