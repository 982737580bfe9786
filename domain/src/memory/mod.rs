//! Shared memory bank domain
//!
//! Knowledge fragments contributed by council roles and triggered actions.
//! Fragments are never mutated: they are appended, deduplicated by exact
//! content, and evicted oldest-first beyond the bank capacity.

pub mod bank;
pub mod fragment;

pub use bank::{AddOutcome, DEFAULT_MEMORY_CAPACITY, MemoryBank};
pub use fragment::{Contributor, FragmentId, MemoryFragment, TAG_ACTION, TAG_SUCCESS};
