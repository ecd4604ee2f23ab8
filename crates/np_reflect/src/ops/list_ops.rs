use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::info::{NonGenericTypeInfoCell, TypeFlags, TypeInfo, Typed};
use crate::{Reflect, ReflectError};

// -----------------------------------------------------------------------------
// List

/// A growable, ordered, index addressable sequence.
///
/// Implemented for `Vec<T>`, `VecDeque<T>` and [`DynamicList`].
pub trait List: Reflect {
    /// The element type, absent for untyped lists.
    fn item_info(&self) -> Option<&'static TypeInfo>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index`.
    ///
    /// `None` if the index is out of bounds or the slot holds no value.
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Replaces the element at `index` in place.
    ///
    /// # Errors
    ///
    /// [`ReflectError::IndexOutOfBounds`] if `index >= len`, or
    /// [`ReflectError::Conversion`] if the value is not an element.
    fn set(&mut self, index: usize, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError>;

    /// Appends a value; typed lists store absence as the zero value.
    fn push(&mut self, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError>;

    /// Removes and returns the element at `index`.
    ///
    /// Does nothing if `index` is out of bounds.
    fn remove(&mut self, index: usize) -> Option<Box<dyn Reflect>>;
}

impl dyn List {
    /// Iterates over the slots of the list, absent slots included.
    #[inline]
    pub fn iter(&self) -> ListItemIter<'_> {
        ListItemIter::new(self)
    }
}

// -----------------------------------------------------------------------------
// ListItemIter

/// An iterator over the slots of a [`List`].
pub struct ListItemIter<'a> {
    list: &'a dyn List,
    index: usize,
}

impl ListItemIter<'_> {
    #[inline(always)]
    pub const fn new(list: &dyn List) -> ListItemIter<'_> {
        ListItemIter { list, index: 0 }
    }
}

impl<'a> Iterator for ListItemIter<'a> {
    type Item = Option<&'a dyn Reflect>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.list.len() {
            let value = self.list.get(self.index);
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let hint = self.list.len().saturating_sub(self.index);
        (hint, Some(hint))
    }
}

impl ExactSizeIterator for ListItemIter<'_> {}

// -----------------------------------------------------------------------------
// DynamicList

/// A growable list of arbitrary, possibly absent, values.
///
/// # Examples
///
/// ```
/// use np_reflect::ops::{DynamicList, List};
///
/// let mut list = DynamicList::new();
/// list.extend(1_i32);
/// list.push(None).unwrap();
/// list.extend(String::from("three"));
///
/// assert_eq!(list.len(), 3);
/// assert!(list.get(1).is_none());
/// assert!(list.get(2).is_some_and(|v| v.is::<String>()));
/// ```
#[derive(Default)]
pub struct DynamicList {
    values: Vec<Option<Box<dyn Reflect>>>,
}

impl Typed for DynamicList {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::class::<Self>().with_flags(TypeFlags::FINAL | TypeFlags::COLLECTION)
        })
    }
}

impl DynamicList {
    #[inline]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends a value.
    #[inline]
    pub fn extend<T: Reflect>(&mut self, value: T) {
        self.values.push(Some(Box::new(value)));
    }

    /// Appends a boxed, possibly absent, value.
    #[inline]
    pub fn extend_boxed(&mut self, value: Option<Box<dyn Reflect>>) {
        self.values.push(value);
    }
}

impl<T: Reflect> FromIterator<T> for DynamicList {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(values: I) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|value| Some(value.into_boxed_reflect()))
                .collect(),
        }
    }
}

impl FromIterator<Option<Box<dyn Reflect>>> for DynamicList {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Option<Box<dyn Reflect>>>>(values: I) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl Reflect for DynamicList {
    crate::reflection::impl_reflect_cast_fn!(List);

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        crate::impls::list_partial_eq(self, other)
    }

    #[inline]
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynamicList(")?;
        crate::impls::list_debug(self, f)?;
        write!(f, ")")
    }
}

impl List for DynamicList {
    #[inline]
    fn item_info(&self) -> Option<&'static TypeInfo> {
        None
    }

    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.values.get(index).and_then(Option::as_deref)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        match self.values.get_mut(index) {
            Some(Some(value)) => Some(&mut **value),
            _ => None,
        }
    }

    fn set(&mut self, index: usize, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(ReflectError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    #[inline]
    fn push(&mut self, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError> {
        self.values.push(value);
        Ok(())
    }

    #[inline]
    fn remove(&mut self, index: usize) -> Option<Box<dyn Reflect>> {
        if index < self.values.len() {
            self.values.remove(index)
        } else {
            None
        }
    }
}

impl fmt::Debug for DynamicList {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    use super::{DynamicList, List};
    use crate::ReflectError;

    #[test]
    fn set_is_strict() {
        let mut list: DynamicList = [1_i32, 2].into_iter().collect();

        list.set(1, Some(Box::new(5_i32))).unwrap();
        assert_eq!(list.get(1).and_then(|v| v.downcast_ref::<i32>()), Some(&5));
        assert!(matches!(
            list.set(2, None),
            Err(ReflectError::IndexOutOfBounds { index: 2, len: 2 })
        ));
    }

    #[test]
    fn remove_out_of_bounds_is_noop() {
        let mut list: DynamicList = [1_i32, 2].into_iter().collect();

        assert!(list.remove(9).is_none());
        assert_eq!(list.len(), 2);
        assert!(list.remove(0).is_some_and(|v| v.is::<i32>()));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn iter_yields_holes() {
        let mut list = DynamicList::new();
        list.extend(1_u8);
        list.extend_boxed(None);

        let slots: Vec<bool> = (&list as &dyn List).iter().map(|v| v.is_some()).collect();
        assert_eq!(slots, [true, false]);
    }
}
