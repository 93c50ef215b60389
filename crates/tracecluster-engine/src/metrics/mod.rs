//! External clustering quality metrics against ground-truth tags.
//!
//! Pair-counting metrics (precision, recall, F-measure, Rand index) and
//! majority-agreement metrics (purity, inverse purity).

pub mod evaluation;
pub mod pairs;
pub mod purity;

pub use evaluation::{evaluate, Scores};
pub use pairs::{confusion_counts, f_measure, precision, rand_index, recall};
pub use purity::{inverse_purity, purity};
