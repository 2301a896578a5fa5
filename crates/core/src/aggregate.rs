//! Aggregate root trait for domain models.

/// Aggregate root marker + minimal interface.
///
/// An aggregate root is the single entry point into a consistency boundary:
/// everything it owns (child value objects, collections) is only mutated
/// through the root's methods, which re-check invariants on every call.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;
}
