//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a transaction, unique within the owner's collection.
pub type TransactionId = DatabaseId;
