use serde::{Deserialize, Serialize};

/// A knowledge-base article. Mutable and deletable, but only by admins.
///
/// Tag order is irrelevant for matching and kept only for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbArticle {
    pub id: u64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
