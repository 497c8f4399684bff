//! Command implementations for the logsight CLI

pub mod ask;
pub mod insights;
pub mod metrics;
pub mod parse;
pub mod upload;

pub use ask::ask;
pub use insights::insights;
pub use metrics::metrics;
pub use parse::parse;
pub use upload::upload;
