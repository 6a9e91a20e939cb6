//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities relate to each other only through ids; the store resolves the
/// relation at read time.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
