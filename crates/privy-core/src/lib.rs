//! Core types for Privy: type descriptors, private member inventories, and
//! biased random selection among them.
//!
//! A test generator hands this crate a type it wants to exercise. The crate
//! collects the type's own private fields and private behaviors through a
//! [`TypeIntrospection`] source and lets the generator pick among them with an
//! injected [`Randomness`] source. Nothing here invokes or mutates the target.

/// Error types used throughout the crate.
pub mod error;
/// The introspection seam and an in-memory catalog implementing it.
pub mod introspect;
/// The inventory of private members for one target type.
pub mod inventory;
/// Type, field, and behavior descriptors.
pub mod model;
/// The randomness seam used for selection.
pub mod random;

/// Re-export error types.
pub use error::{InventoryError, InventoryResult};
/// Re-export introspection types.
pub use introspect::{TypeCatalog, TypeDefinition, TypeIntrospection};
/// Re-export inventory types.
pub use inventory::{Member, MemberInventory};
/// Re-export descriptor types.
pub use model::{Accessibility, BehaviorDescriptor, FieldDescriptor, MemberScope, TypeDescriptor};
/// Re-export randomness types.
pub use random::{Randomness, SeededRandomness};
