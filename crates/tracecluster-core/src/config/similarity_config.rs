//! Similarity provider configuration.

use serde::{Deserialize, Serialize};

/// How graph labels are weighted in the histogram kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Each distinct address (or transition) counts once.
    #[default]
    Presence,
    /// Each address (or transition) counts by its hit count.
    HitCount,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Label weighting. Default: presence.
    pub weighting: Option<Weighting>,
    /// Include transitions as well as addresses. Default: true.
    pub include_edges: Option<bool>,
}

impl SimilarityConfig {
    pub fn effective_weighting(&self) -> Weighting {
        self.weighting.unwrap_or_default()
    }

    pub fn effective_include_edges(&self) -> bool {
        self.include_edges.unwrap_or(true)
    }
}
