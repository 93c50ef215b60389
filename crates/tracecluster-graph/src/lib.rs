//! # tracecluster-graph
//!
//! Turns recorded address traces into dynamic control-flow graphs (DCFGs)
//! and scores graph collections with a normalised histogram kernel.

pub mod dcfg;
pub mod similarity;
pub mod trace_file;

pub use dcfg::{Dcfg, DcfgBuilder};
pub use similarity::HitHistogramSimilarity;
