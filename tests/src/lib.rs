//! # DSV Test Suite
//!
//! Unified test crate for the signature validation engine.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Certificate hierarchies, CRLs, signature builders
//! ├── integration/      # End-to-end validation scenarios
//! │   ├── e2e_scenarios.rs
//! │   ├── pades_dss.rs
//! │   └── timestamps.rs
//! └── properties/       # proptest properties over reconciliation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p dsv-tests
//!
//! # By category
//! cargo test -p dsv-tests integration::
//! cargo test -p dsv-tests properties::
//!
//! # Benchmarks
//! cargo bench -p dsv-tests
//! ```

pub mod fixtures;
pub mod integration;
pub mod properties;
