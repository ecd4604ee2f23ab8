use core::any::TypeId;
use core::fmt::Debug;

use crate::hash::NoOpHashState;
use crate::hash::hashbrown::HashMap;
use crate::hash::hashbrown::hash_map::Entry;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map with [`TypeId`] as the fixed key type.
///
/// Keys are already well distributed, so hashing is a pass-through
/// ([`NoOpHashState`]).
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use np_utils::TypeIdMap;
///
/// let mut map = TypeIdMap::new();
/// map.get_or_insert(TypeId::of::<u32>(), || "u32");
///
/// assert_eq!(map.get_type::<u32>(), Some(&"u32"));
/// assert!(!map.contains_type::<u64>());
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    /// Creates an empty `TypeIdMap`.
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    /// Gets a mutable reference to the value of `type_id`,
    /// inserting the result of `f` if the key is not present.
    ///
    /// `f` is only called if the key is not present.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        match self.0.entry(type_id) {
            Entry::Vacant(entry) => entry.insert(f()),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    /// Like [`get_or_insert`](Self::get_or_insert), but the constructor may fail.
    ///
    /// On failure nothing is inserted and the error is returned.
    pub fn try_get_or_insert<E>(
        &mut self,
        type_id: TypeId,
        f: impl FnOnce() -> Result<V, E>,
    ) -> Result<&mut V, E> {
        match self.0.entry(type_id) {
            Entry::Vacant(entry) => Ok(entry.insert(f()?)),
            Entry::Occupied(entry) => Ok(entry.into_mut()),
        }
    }

    /// Returns a reference to the value of `type_id`.
    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    /// Returns a reference to the value of type `T`.
    #[inline(always)]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    /// Returns `true` if the map contains a value for `type_id`.
    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    /// Returns `true` if the map contains a value for type `T`.
    #[inline(always)]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&TypeId::of::<T>())
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Traits

impl<T> Default for TypeIdMap<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for TypeIdMap<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn get_or_insert_runs_constructor_once() {
        let mut map = TypeIdMap::new();
        let mut calls = 0;
        for _ in 0..3 {
            map.get_or_insert(TypeId::of::<i8>(), || {
                calls += 1;
                10
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(map.get_type::<i8>(), Some(&10));
    }

    #[test]
    fn failed_constructor_inserts_nothing() {
        let mut map = TypeIdMap::<u8>::new();
        let result = map.try_get_or_insert(TypeId::of::<u8>(), || Err("boom"));
        assert_eq!(result, Err("boom"));
        assert!(map.is_empty());

        let value = map.try_get_or_insert::<()>(TypeId::of::<u8>(), || Ok(4));
        assert_eq!(value.map(|v| *v), Ok(4));
        assert_eq!(map.len(), 1);
    }
}
