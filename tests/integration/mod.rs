//! Integration tests for Courier
//!
//! These tests drive the real router against a wiremock completion endpoint
//! and verify the envelope and chunk-stream contracts end to end.

mod chat;
mod operations;
mod streaming;
