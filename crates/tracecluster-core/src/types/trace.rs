//! Trace identity: an opaque handle plus its ordinal input position.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One input trace. `position` is stable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trace {
    pub position: usize,
    pub path: PathBuf,
}

impl Trace {
    pub fn new(position: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            position,
            path: path.into(),
        }
    }

    /// Assign positions in input order.
    pub fn sequence<P: AsRef<Path>>(paths: &[P]) -> Vec<Trace> {
        paths
            .iter()
            .enumerate()
            .map(|(i, p)| Trace::new(i, p.as_ref()))
            .collect()
    }

    /// Lossy display form of the path, used as the report key.
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}
