use serde::{Deserialize, Serialize};

/// Sentiment bucket for a review's compound score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// A review with its sentiment attached, ready to display
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewSentiment {
    pub author: String,
    /// Review text, truncated for display
    pub content: String,
    pub label: SentimentLabel,
    /// Compound score rounded to two decimals
    pub score: f64,
}

/// Label counts and mean compound score over a set of reviews
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SentimentSummary {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub average_score: f64,
}
