pub mod backend;
pub mod client;
pub mod http;
pub mod monitor;
pub mod types;

pub use backend::{ChatBackend, ExchangeError};
pub use client::ExchangeClient;
pub use http::HttpBackend;
pub use monitor::ConnectionMonitor;
pub use types::{ChatRequest, ChatResponse, ProbeOutcome};
