//! Entity trait: identity that survives recomputation.

/// Entity marker + minimal interface.
///
/// A forecast is retrained many times over its life; every retrain replaces
/// its derived data but never its identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Number of times the entity's derived state has been (re)computed.
    fn version(&self) -> u64;
}
