//! # Shared Types Crate
//!
//! Vocabulary shared by every signature validation subsystem.
//!
//! ## Contents
//!
//! - **Entities**: `TokenKind`, `TokenId` (content-derived identity of a certificate
//!   or revocation datum)
//! - **Verdict**: `Indication` and `SubIndication` as defined by ETSI EN 319 102-1
//! - **Errors**: `ContractError` for malformed input handed over by a collaborator
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: verdict codes are defined once and reused by the
//!   constraint engine, the validation processes and the report assembler.
//! - **Evidence gaps are data**: nothing in this crate models a missing token as an
//!   error. Only caller defects are represented by `ContractError`.

pub mod entities;
pub mod errors;
pub mod verdict;

pub use entities::*;
pub use errors::*;
pub use verdict::*;
