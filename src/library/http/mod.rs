//! Structures for sending HTTP requests to upstream services

mod client;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{build_client, endpoint, HttpClient};
