use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::convert;
use crate::info::{NonGenericTypeInfoCell, TypeInfo, Typed};
use crate::{Reflect, ReflectError};

// -----------------------------------------------------------------------------
// Array

/// A fixed-length, index addressable collection.
///
/// The length of an array never changes in place: growing or removing an
/// element swaps in a new backing allocation
/// ([`reallocate`](Array::reallocate), [`remove`](Array::remove)).
///
/// Implemented for `Box<[T]>` and [`DynamicArray`].
pub trait Array: Reflect {
    /// The element type, absent for untyped arrays.
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

    /// Replaces the element at `index`.
    ///
    /// Absence is stored as the element type's zero value.
    ///
    /// # Errors
    ///
    /// [`ReflectError::IndexOutOfBounds`] if `index >= len`, or
    /// [`ReflectError::Conversion`] if the value is not an element.
    fn set(&mut self, index: usize, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError>;

    /// Replaces the backing storage with one of `len` elements.
    ///
    /// Existing elements are kept up to `len`, new slots hold the zero value.
    fn reallocate(&mut self, len: usize);

    /// Replaces the backing storage with one lacking the element at `index`.
    ///
    /// # Errors
    ///
    /// [`ReflectError::IndexOutOfBounds`] if `index >= len`.
    fn remove(&mut self, index: usize) -> Result<(), ReflectError>;
}

impl dyn Array {
    /// Iterates over the slots of the array, absent slots included.
    #[inline]
    pub fn iter(&self) -> ArrayItemIter<'_> {
        ArrayItemIter::new(self)
    }
}

// -----------------------------------------------------------------------------
// ArrayItemIter

/// An iterator over the slots of an [`Array`].
pub struct ArrayItemIter<'a> {
    array: &'a dyn Array,
    index: usize,
}

impl ArrayItemIter<'_> {
    #[inline(always)]
    pub const fn new(array: &dyn Array) -> ArrayItemIter<'_> {
        ArrayItemIter { array, index: 0 }
    }
}

impl<'a> Iterator for ArrayItemIter<'a> {
    type Item = Option<&'a dyn Reflect>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.array.len() {
            let value = self.array.get(self.index);
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let hint = self.array.len().saturating_sub(self.index);
        (hint, Some(hint))
    }
}

impl ExactSizeIterator for ArrayItemIter<'_> {}

// -----------------------------------------------------------------------------
// DynamicArray

/// A fixed-length array of arbitrary, possibly absent, values.
///
/// An optional element type makes the array coerce written values and
/// fill new slots with the element type's zero value.
///
/// # Examples
///
/// ```
/// use np_reflect::ops::{Array, DynamicArray};
/// use np_reflect::info::Typed;
///
/// let mut array = DynamicArray::new(Some(i32::type_info()), 2);
/// array.set(1, Some(Box::new(7_u8))).unwrap();
///
/// assert_eq!(array.get(0).and_then(|v| v.downcast_ref::<i32>()), Some(&0));
/// assert_eq!(array.get(1).and_then(|v| v.downcast_ref::<i32>()), Some(&7));
/// assert!(array.set(2, None).is_err());
/// ```
#[derive(Default)]
pub struct DynamicArray {
    item: Option<&'static TypeInfo>,
    values: Box<[Option<Box<dyn Reflect>>]>,
}

impl Typed for DynamicArray {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::array::<Self>(None))
    }
}

impl DynamicArray {
    /// Creates an array of `len` zero values of `item`.
    pub fn new(item: Option<&'static TypeInfo>, len: usize) -> Self {
        Self {
            item,
            values: (0..len).map(|_| convert::zero_or_absent(item)).collect(),
        }
    }

    /// Creates an array holding `values` as they are.
    pub fn from_values(
        item: Option<&'static TypeInfo>,
        values: impl IntoIterator<Item = Option<Box<dyn Reflect>>>,
    ) -> Self {
        Self {
            item,
            values: values.into_iter().collect(),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), ReflectError> {
        if index < self.values.len() {
            Ok(())
        } else {
            Err(ReflectError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            })
        }
    }
}

impl<T: Reflect> FromIterator<T> for DynamicArray {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(values: I) -> Self {
        Self {
            item: None,
            values: values
                .into_iter()
                .map(|value| Some(value.into_boxed_reflect()))
                .collect(),
        }
    }
}

impl Reflect for DynamicArray {
    crate::reflection::impl_reflect_cast_fn!(Array);

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        crate::impls::array_partial_eq(self, other)
    }

    #[inline]
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynamicArray(")?;
        crate::impls::array_debug(self, f)?;
        write!(f, ")")
    }
}

impl Array for DynamicArray {
    #[inline]
    fn item_info(&self) -> Option<&'static TypeInfo> {
        self.item
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
        self.check_index(index)?;
        self.values[index] = convert::coerce(value, self.item)?;
        Ok(())
    }

    fn reallocate(&mut self, len: usize) {
        let item = self.item;
        let mut values = Vec::with_capacity(len);
        values.extend(core::mem::take(&mut self.values).into_vec().into_iter().take(len));
        values.resize_with(len, || convert::zero_or_absent(item));
        self.values = values.into_boxed_slice();
    }

    fn remove(&mut self, index: usize) -> Result<(), ReflectError> {
        self.check_index(index)?;
        let mut values = core::mem::take(&mut self.values).into_vec();
        values.remove(index);
        self.values = values.into_boxed_slice();
        Ok(())
    }
}

impl fmt::Debug for DynamicArray {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{Array, DynamicArray};
    use crate::info::Typed;
    use crate::{Reflect, ReflectError};

    fn ints(array: &dyn Array) -> Vec<Option<i32>> {
        array
            .iter()
            .map(|v| v.and_then(|v| v.downcast_ref::<i32>()).copied())
            .collect()
    }

    #[test]
    fn reallocate_keeps_prefix() {
        let mut array = DynamicArray::from_values(
            Some(i32::type_info()),
            [1, 2, 3].map(|v: i32| Some(v.into_boxed_reflect())),
        );

        array.reallocate(5);
        assert_eq!(ints(&array), [Some(1), Some(2), Some(3), Some(0), Some(0)]);

        array.reallocate(2);
        assert_eq!(ints(&array), [Some(1), Some(2)]);
    }

    #[test]
    fn untyped_slots_stay_absent() {
        let mut array: DynamicArray = [String::from("a")].into_iter().collect();
        array.reallocate(2);

        assert_eq!(array.len(), 2);
        assert!(array.get(1).is_none());
        array.set(1, Some(Box::new(3_u8))).unwrap();
        assert!(array.get(1).is_some_and(|v| v.is::<u8>()));
    }

    #[test]
    fn remove_shifts() {
        let mut array: DynamicArray = [10, 20, 30].into_iter().collect();

        array.remove(0).unwrap();
        assert_eq!(ints(&array), [Some(20), Some(30)]);
        assert!(matches!(
            array.remove(2),
            Err(ReflectError::IndexOutOfBounds { index: 2, len: 2 })
        ));
    }

    #[test]
    fn set_rejects_foreign_values() {
        let mut array = DynamicArray::new(Some(i32::type_info()), 1);
        let error = array.set(0, Some(Box::new(String::from("x")))).unwrap_err();

        assert!(matches!(error, ReflectError::Conversion(_)));
    }
}
