//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by all of their fields.
/// Equality and hashing are derived per type; there is no shared base with a
/// generic "equality components" list.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct PhoneNumber { number: String, kind: String }
///
/// impl ValueObject for PhoneNumber {}
/// ```
///
/// The `Eq + Hash` bounds let owners keep value objects in sets and detect
/// duplicates structurally.
pub trait ValueObject: Clone + Eq + core::hash::Hash + core::fmt::Debug {}
