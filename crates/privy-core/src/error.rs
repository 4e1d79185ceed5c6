/// Alias for `Result<T, InventoryError>`.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Errors raised by a [`MemberInventory`](crate::MemberInventory).
///
/// Both variants signal a caller contract violation. Neither is transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// The inventory was requested for a missing or unknown type.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A selection was requested from an empty member collection.
    #[error("invalid state: {0}")]
    InvalidState(String),
}
