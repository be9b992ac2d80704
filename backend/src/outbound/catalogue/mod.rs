//! Product catalogue outbound adapter.
//!
//! Thin reqwest implementation of the `ProductSource` port. Retries live in
//! the domain resolver, so each call here is exactly one attempt.

mod dto;
mod http_source;

pub use http_source::HttpProductSource;
