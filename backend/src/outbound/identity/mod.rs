//! Identity service outbound adapter.
//!
//! Thin reqwest implementation of the `IdentityVerifier` port.

mod dto;
mod http_verifier;

pub use http_verifier::HttpIdentityVerifier;
