//! Shared test utilities for vault-token.
//!
//! This crate provides:
//! - A recording [`MockTransport`](mocks::MockTransport)
//! - Proptest generators for token and role inputs
//! - Vault response fixtures

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::{MockTransport, RecordedCall, Verb};
