//! Shared data models

mod assist;
mod entry;
mod metrics;
mod wire;

pub use assist::*;
pub use entry::*;
pub use metrics::*;
pub use wire::*;
