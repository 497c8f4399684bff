//! HTTP request handlers for the Logsight API

pub mod metrics;
pub mod query;
pub mod upload;
