//! bgy_core: Core types, domains, and integer helpers for the barangay engine.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! workspace (`bgy_io`, `bgy_algo`, `bgy_pipeline`, `bgy_report`, `bgy_cli`).
//!
//! - Entity kinds (`senior`, `pwd`, `youth`) and their breakdown profiles
//! - `Category` / `Breakdown` (zero-filled per-profile counters)
//! - Canonical barangay registry + explicit alias table
//! - Closed `Role` enumeration with its landing-route table
//! - Integer-first rounding (means, tenths-of-percent shares)
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Error set for core-domain validation & parsing.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidRatio,
        InvalidToken(String),
        EmptyRegistry,
        EmptyBarangayName,
        DuplicateBarangay(String),
        InvalidCoordinate(String),
        UnknownAliasTarget { alias: String, target: String },
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidRatio => write!(f, "invalid ratio"),
                CoreError::InvalidToken(t) => write!(f, "invalid token: {t}"),
                CoreError::EmptyRegistry => write!(f, "canonical registry is empty"),
                CoreError::EmptyBarangayName => write!(f, "barangay name is empty"),
                CoreError::DuplicateBarangay(n) => write!(f, "duplicate barangay: {n}"),
                CoreError::InvalidCoordinate(n) => write!(f, "invalid coordinate for barangay: {n}"),
                CoreError::UnknownAliasTarget { alias, target } => {
                    write!(f, "alias '{alias}' targets unknown barangay '{target}'")
                }
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod entities;
pub mod normalize;
pub mod registry;
pub mod roles;
pub mod rounding;

pub use entities::{Breakdown, Category, EntityKind, Resident};
pub use errors::CoreError;
pub use registry::{AliasTable, BarangayCanonical, CanonicalRegistry};
pub use roles::Role;
