//! Reference resolution and reconciliation

pub mod reconcile;
pub mod resolver;

pub use reconcile::{build_pool, check_limits, reconcile_owner, reconcile_signature, SignatureEvidence};
pub use resolver::{ReferenceResolver, Resolution, ResolvedReference};
