//! Domain layer for evidence reconciliation

pub mod errors;
pub mod found;
pub mod identity;
pub mod invariants;
pub mod origins;
pub mod references;
pub mod signature;
pub mod sources;
pub mod store;
pub mod tokens;

pub use errors::EvidenceError;
pub use found::*;
pub use identity::*;
pub use origins::*;
pub use references::*;
pub use signature::*;
pub use sources::*;
pub use store::TokenStore;
pub use tokens::*;
