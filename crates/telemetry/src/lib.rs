//! Observability for the sortlab service: structured logging and request
//! metrics. The gateway records one counter increment and one latency
//! observation per handled request and serves the registry at `/metrics`.

pub mod init;
pub mod metrics;

pub use init::init_tracing;
