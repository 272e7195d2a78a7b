//! Native HTTP client for Kupo endpoints.
//!
//! Implements [`KupoApi`](super::KupoApi) over plain GET requests using
//! `reqwest`, with an explicit per-instance transport configuration,
//! status-code mapping, JSON decoding and required-field validation.

mod client;
mod connection;
mod parsing;

pub use client::HttpKupoClient;
pub use connection::ClientConfig;
