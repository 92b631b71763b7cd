//! Domain layer for the constraint engine

pub mod block;
pub mod check;
pub mod errors;
pub mod message_tags;

pub use block::{BlockChild, BlockKind, BlockResult, CheckBlock, Conclusion, ProcessingMode};
pub use check::{CheckDescriptor, CheckKind, CheckResult, ConstraintCheck, CryptoSubject, NO_POLICY};
pub use errors::PolicyError;
pub use message_tags::MessageTag;
