//! Integration Test Runner
//!
//! Entry point for all integration tests. The flows run against an in-memory
//! ledger double and a local Ed25519 signer.
//!
//! Run all tests:
//! ```bash
//! cargo test --test integration
//! ```
//!
//! Run specific test module:
//! ```bash
//! cargo test --test integration payment_flow
//! cargo test --test integration session_flow
//! ```

pub mod mock;
pub mod payment_flow;
pub mod session_flow;
