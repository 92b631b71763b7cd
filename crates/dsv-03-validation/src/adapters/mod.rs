//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits: issuance verification and the clock.

mod clock;
mod name_chaining;

pub use clock::{FixedTimeSource, SystemTimeSource};
pub use name_chaining::NameChainingVerifier;
