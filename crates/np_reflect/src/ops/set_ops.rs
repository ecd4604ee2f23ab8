use alloc::boxed::Box;

use crate::info::TypeInfo;
use crate::{Reflect, ReflectError};

// -----------------------------------------------------------------------------
// Set

/// An unordered collection.
///
/// Sets have no positional access: element `i` is whatever a fresh
/// traversal yields after `i` steps. Positional removal walks a cursor
/// through [`retain`](Set::retain).
///
/// Implemented for `BTreeSet<T>` and `np_utils::hash::HashSet<T>`.
pub trait Set: Reflect {
    /// The element type, absent for untyped sets.
    fn item_info(&self) -> Option<&'static TypeInfo>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Traverses the elements in the set's own order.
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    /// Returns `true` if an equal element is present.
    fn contains(&self, value: &dyn Reflect) -> bool;

    /// Inserts a value, returning `true` if it was not present yet.
    ///
    /// # Errors
    ///
    /// [`ReflectError::Conversion`] if the value is not an element.
    fn insert(&mut self, value: Box<dyn Reflect>) -> Result<bool, ReflectError>;

    /// Keeps only the elements for which `f` returns `true`.
    ///
    /// `f` sees the elements in traversal order.
    fn retain(&mut self, f: &mut dyn FnMut(&dyn Reflect) -> bool);
}
