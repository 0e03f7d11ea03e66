//! The hash-set used by this crate.

/// The hash-set type used by this crate.
pub use hashbrown::HashSet;
