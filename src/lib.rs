//! # Poset Registry
//!
//! A registry of independent partially ordered sets, each addressed by a small
//! integer handle.
//!
//! Every poset keeps its relation fully closed: adding `a <= b` immediately
//! materializes every pair implied by transitivity, so reflexivity,
//! antisymmetry and transitivity hold after every call. Handles of deleted
//! posets are recycled.
//!
//! ```
//! use poset_registry::Registry;
//!
//! let mut registry = Registry::new();
//! let p = registry.new_poset();
//! for name in ["a", "b", "c"] {
//!     assert!(registry.insert(p, name));
//! }
//! assert!(registry.add(p, "a", "b"));
//! assert!(registry.add(p, "b", "c"));
//! assert!(registry.test(p, "a", "c"));
//! assert!(!registry.del(p, "a", "c"));
//! ```
mod config;
mod error;
mod handle;
mod poset;
mod registry;
mod snapshot;

pub use config::RegistryConfig;
pub use error::{InvariantViolation, PosetError};
pub use handle::{HandleAllocator, PosetHandle};
pub use poset::{ElementId, Poset};
pub use registry::Registry;
pub use snapshot::PosetSnapshot;
