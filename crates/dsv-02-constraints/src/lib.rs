//! # DSV-02: Constraint Engine
//!
//! Policy-driven atomic checks and their aggregation into basic building
//! blocks (ETSI EN 319 102-1).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    ValidationPolicy                      │
//! │   signature / timestamp / revocation / cryptographic     │
//! └───────────────────────────┬──────────────────────────────┘
//!                             │ Option<&Constraint>
//!                             ▼
//! ┌──────────────────┐   evaluate()   ┌──────────────────────┐
//! │ ConstraintCheck  │ ─────────────► │ CheckResult          │
//! │ (CheckKind enum) │                │ passed, level, tags  │
//! └────────┬─────────┘                └──────────┬───────────┘
//!          │ ordered children                    │ first FAIL wins
//!          ▼                                     ▼
//! ┌──────────────────┐   evaluate()   ┌──────────────────────┐
//! │ CheckBlock       │ ─────────────► │ BlockResult          │
//! │ ISC VCI XCV ...  │                │ Conclusion           │
//! └──────────────────┘                └──────────────────────┘
//! ```
//!
//! ## Levels
//!
//! | Level | Failure effect |
//! |-------|----------------|
//! | IGNORE | Not evaluated |
//! | INFORM | Recorded as info |
//! | WARN | Recorded as warning |
//! | FAIL | Becomes the block conclusion |

pub mod domain;
pub mod policy;

pub use domain::*;
pub use policy::{
    CertificateConstraints, Constraint, CryptographicConstraint, Level, RevocationConstraints,
    SignatureConstraints, TimestampConstraints, ValidationPolicy, ANY_VALUE,
};
