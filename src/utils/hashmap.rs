//! The hash-map used by this crate.

/// The hash-map type used by this crate.
pub use hashbrown::HashMap;
