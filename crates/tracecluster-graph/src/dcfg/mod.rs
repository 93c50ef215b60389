//! Dynamic control-flow graphs: visited addresses and observed transitions,
//! both annotated with hit counts.

pub mod builder;
pub mod ego;
pub mod types;

pub use builder::DcfgBuilder;
pub use types::{AddressNode, Dcfg, TransitionEdge};
