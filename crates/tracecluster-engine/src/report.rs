//! JSON reports: clusters by label, outliers, and scores.
//!
//! Maps are `BTreeMap` and struct fields are declared in key order, so the
//! serialized JSON always has sorted keys.

use std::collections::BTreeMap;
use std::hash::Hash;

use serde::Serialize;
use tracecluster_core::errors::MetricsError;
use tracecluster_core::types::{ClusterLabel, LabelSequence};

use crate::metrics::{evaluate, Scores};

/// Paths grouped by rendered cluster label.
pub type ClusterGroups = BTreeMap<String, Vec<String>>;

/// The five headline scores. Undefined metrics serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoresReport {
    #[serde(rename = "F-measure")]
    pub f_measure: Option<f64>,
    #[serde(rename = "Inverse Purity")]
    pub inverse_purity: Option<f64>,
    #[serde(rename = "Precision")]
    pub precision: Option<f64>,
    #[serde(rename = "Purity")]
    pub purity: Option<f64>,
    #[serde(rename = "Recall")]
    pub recall: Option<f64>,
}

impl From<&Scores> for ScoresReport {
    fn from(s: &Scores) -> Self {
        Self {
            f_measure: s.f_measure,
            inverse_purity: s.inverse_purity,
            precision: s.precision,
            purity: s.purity,
            recall: s.recall,
        }
    }
}

/// Report without ground truth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseReport {
    #[serde(rename = "Outlier", skip_serializing_if = "Option::is_none")]
    pub outlier: Option<Vec<String>>,
    #[serde(rename = "Result")]
    pub result: ClusterGroups,
}

/// Report with ground truth: outliers grouped by their true tag, plus scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport {
    #[serde(rename = "Outlier", skip_serializing_if = "Option::is_none")]
    pub outlier: Option<ClusterGroups>,
    #[serde(rename = "Result")]
    pub result: ClusterGroups,
    #[serde(rename = "Score")]
    pub score: ScoresReport,
}

/// Either report shape, serialized untagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Base(BaseReport),
    Full(FullReport),
}

impl Report {
    pub fn result(&self) -> &ClusterGroups {
        match self {
            Self::Base(r) => &r.result,
            Self::Full(r) => &r.result,
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.result().len()
    }

    /// Number of outlier traces, `None` when the run had none.
    pub fn outlier_count(&self) -> Option<usize> {
        match self {
            Self::Base(r) => r.outlier.as_ref().map(Vec::len),
            Self::Full(r) => r.outlier.as_ref().map(|g| g.values().map(Vec::len).sum()),
        }
    }

    pub fn scores(&self) -> Option<&ScoresReport> {
        match self {
            Self::Base(_) => None,
            Self::Full(r) => Some(&r.score),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn check_len(paths: usize, labels: usize) -> Result<(), MetricsError> {
    if paths != labels {
        return Err(MetricsError::LengthMismatch {
            predicted: labels,
            truth: paths,
        });
    }
    Ok(())
}

fn group_clusters<P: AsRef<str>>(paths: &[P], labels: &LabelSequence) -> ClusterGroups {
    let mut groups = ClusterGroups::new();
    for (path, label) in paths.iter().zip(labels) {
        if let ClusterLabel::Cluster(_) = label {
            groups
                .entry(label.to_string())
                .or_default()
                .push(path.as_ref().to_string());
        }
    }
    groups
}

/// Group `paths` by label; outliers are listed separately.
pub fn base_report<P: AsRef<str>>(
    paths: &[P],
    labels: &LabelSequence,
) -> Result<BaseReport, MetricsError> {
    check_len(paths.len(), labels.len())?;

    let outliers: Vec<String> = paths
        .iter()
        .zip(labels)
        .filter(|(_, label)| label.is_outlier())
        .map(|(p, _)| p.as_ref().to_string())
        .collect();

    Ok(BaseReport {
        outlier: (!outliers.is_empty()).then_some(outliers),
        result: group_clusters(paths, labels),
    })
}

/// Group `paths` by label, outliers by their true tag, and score the
/// non-outlier traces against `truth`.
pub fn full_report<P, T>(
    paths: &[P],
    labels: &LabelSequence,
    truth: &[T],
    beta: f64,
) -> Result<FullReport, MetricsError>
where
    P: AsRef<str>,
    T: AsRef<str> + Eq + Hash,
{
    check_len(paths.len(), labels.len())?;
    let scores = evaluate(labels, truth, beta)?;

    let mut outliers = ClusterGroups::new();
    for ((path, label), tag) in paths.iter().zip(labels).zip(truth) {
        if label.is_outlier() {
            outliers
                .entry(tag.as_ref().to_string())
                .or_default()
                .push(path.as_ref().to_string());
        }
    }

    Ok(FullReport {
        outlier: (!outliers.is_empty()).then_some(outliers),
        result: group_clusters(paths, labels),
        score: ScoresReport::from(&scores),
    })
}
