//! # DSV-01: Evidence Reconciliation Subsystem
//!
//! Collects every certificate and revocation token reachable from a
//! signature, deduplicates them by content identity and classifies every
//! declared reference as related (a located token) or orphan.
//!
//! ## Architecture
//!
//! - **Domain**: Tokens, origins, references, sources, the token store and
//!   the reconciled `FoundEvidence` view
//! - **Algorithms**: Indexed reference resolution and the per-owner
//!   reconciliation reduction
//! - **Config**: Input bounds
//!
//! Evidence gaps are data: an unresolved reference is an orphan, never an
//! error. Only malformed input or exceeded bounds return `Err`.

pub mod algorithms;
pub mod config;
pub mod domain;

pub use algorithms::{
    reconcile_owner, reconcile_signature, ReferenceResolver, Resolution, ResolvedReference, SignatureEvidence,
};
pub use config::ReconciliationLimits;
pub use domain::*;
