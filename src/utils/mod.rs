//! Various unsorted utilities.

pub mod hashmap;
pub mod hashset;
