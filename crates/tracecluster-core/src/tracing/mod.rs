//! Observability for trace clustering.
//! `tracing` crate with `EnvFilter`, filter read from `TRACECLUSTER_LOG`.

pub mod metrics;
pub mod setup;

pub use setup::init_tracing;
