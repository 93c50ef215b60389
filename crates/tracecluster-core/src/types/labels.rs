//! Cluster labels, outlier masks, and the original-order label sequence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::OUTLIER_SENTINEL;

/// Per-row verdict of an anomaly detector (`-1` / `1` in the classic encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyFlag {
    Outlier,
    Normal,
}

impl AnomalyFlag {
    /// Decode the classic `{-1, 1}` encoding. Any negative value is an outlier.
    pub fn from_sign(value: i32) -> Self {
        if value < 0 {
            Self::Outlier
        } else {
            Self::Normal
        }
    }

    pub fn is_outlier(&self) -> bool {
        matches!(self, Self::Outlier)
    }
}

/// One entry per original trace; `true` excludes the trace from clustering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutlierMask(Vec<bool>);

impl OutlierMask {
    /// Mask of `n` entries with nothing excluded.
    pub fn clear(n: usize) -> Self {
        Self(vec![false; n])
    }

    pub fn from_flags(flags: &[AnomalyFlag]) -> Self {
        Self(flags.iter().map(AnomalyFlag::is_outlier).collect())
    }

    pub fn from_bools(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_outlier(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Whether any trace is excluded.
    pub fn has_outliers(&self) -> bool {
        self.0.iter().any(|&b| b)
    }

    pub fn outlier_count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// Original positions of kept traces, in original order.
    pub fn kept_indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &excluded)| !excluded)
            .map(|(i, _)| i)
            .collect()
    }

    /// Original positions of excluded traces, in original order.
    pub fn outlier_indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &excluded)| excluded)
            .map(|(i, _)| i)
            .collect()
    }

    /// Keep the items whose mask entry is `false`, preserving order.
    pub fn select_kept<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .zip(&self.0)
            .filter(|(_, &excluded)| !excluded)
            .map(|(item, _)| item.clone())
            .collect()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

/// A cluster id, or the sentinel marking a trace excluded as an outlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterLabel {
    Cluster(usize),
    Outlier,
}

impl ClusterLabel {
    pub fn is_outlier(&self) -> bool {
        matches!(self, Self::Outlier)
    }

    pub fn cluster_id(&self) -> Option<usize> {
        match self {
            Self::Cluster(id) => Some(*id),
            Self::Outlier => None,
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster(id) => write!(f, "{id}"),
            Self::Outlier => f.write_str(OUTLIER_SENTINEL),
        }
    }
}

impl Serialize for ClusterLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClusterLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == OUTLIER_SENTINEL {
            return Ok(Self::Outlier);
        }
        raw.parse::<usize>()
            .map(Self::Cluster)
            .map_err(serde::de::Error::custom)
    }
}

/// Labels aligned to the original trace order. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSequence(Vec<ClusterLabel>);

impl LabelSequence {
    pub fn new(labels: Vec<ClusterLabel>) -> Self {
        Self(labels)
    }

    /// Wrap raw cluster ids (no outliers).
    pub fn from_clusters(ids: &[usize]) -> Self {
        Self(ids.iter().map(|&id| ClusterLabel::Cluster(id)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ClusterLabel> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClusterLabel> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ClusterLabel] {
        &self.0
    }

    pub fn outlier_count(&self) -> usize {
        self.0.iter().filter(|l| l.is_outlier()).count()
    }

    /// Number of distinct real clusters (outliers excluded).
    pub fn cluster_count(&self) -> usize {
        let mut ids: Vec<usize> = self.0.iter().filter_map(ClusterLabel::cluster_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

impl<'a> IntoIterator for &'a LabelSequence {
    type Item = &'a ClusterLabel;
    type IntoIter = std::slice::Iter<'a, ClusterLabel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
