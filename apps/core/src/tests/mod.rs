//! Test Module
//!
//! Integration-level tests for the MediAssist backend.
//!
//! ## Test Categories
//! - `coordinator_tests`: full pipeline behavior through `generate_response`
//! - `server_tests`: HTTP shell handlers, sessions, and rate limiting
//!
//! Unit tests for the individual brain components live next to the
//! components themselves.
