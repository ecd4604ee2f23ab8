use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use log::trace;

use super::{unwrap, unwrap_mut};
use crate::ops::{ListItemIter, ReflectMut, ReflectRef};
use crate::{Reflect, ReflectError};

// -----------------------------------------------------------------------------
// Reads

/// The number of elements of the unwrapped value.
///
/// Absence has no elements, a scalar counts as one.
pub fn length(value: Option<&dyn Reflect>) -> usize {
    let Some(value) = unwrap(value) else {
        return 0;
    };
    match value.reflect_ref() {
        ReflectRef::Array(array) => array.len(),
        ReflectRef::List(list) => list.len(),
        ReflectRef::Set(set) => set.len(),
        ReflectRef::Container(_) | ReflectRef::Opaque(_) => 1,
    }
}

/// The element at `index` of the unwrapped value.
///
/// An index past the end reads as absence. Unordered collections are
/// walked `index` steps in traversal order. A scalar is returned as is,
/// whatever the index.
///
/// # Examples
///
/// ```
/// use np_reflect::{Reflect, access};
///
/// let names = vec![String::from("a"), String::from("b")];
///
/// let b = access::get(Some(names.as_reflect()), 1).unwrap();
/// assert_eq!(b.downcast_ref::<String>().unwrap(), "b");
/// assert!(access::get(Some(names.as_reflect()), 2).is_none());
/// assert!(access::get(Some(7_i32.as_reflect()), 3).is_some());
/// ```
pub fn get(value: Option<&dyn Reflect>, index: usize) -> Option<&dyn Reflect> {
    let value = unwrap(value)?;
    match value.reflect_ref() {
        ReflectRef::Array(array) => array.get(index),
        ReflectRef::List(list) => list.get(index),
        ReflectRef::Set(set) => set.iter().nth(index),
        ReflectRef::Container(_) | ReflectRef::Opaque(_) => Some(value),
    }
}

/// Iterates over the elements of `value`.
///
/// Containers are not unwrapped: like any other single value they
/// iterate as themselves. Arrays are copied into a snapshot first.
pub fn iterate(value: Option<&dyn Reflect>) -> ValueIter<'_> {
    let Some(value) = value else {
        return ValueIter(Inner::Done);
    };
    let inner = match value.reflect_ref() {
        ReflectRef::Array(array) => Inner::Snapshot(array.iter().collect::<Vec<_>>().into_iter()),
        ReflectRef::List(list) => Inner::List(list.iter()),
        ReflectRef::Set(set) => Inner::Set(set.iter()),
        ReflectRef::Container(_) | ReflectRef::Opaque(_) => Inner::Single(value),
    };
    ValueIter(inner)
}

// -----------------------------------------------------------------------------
// ValueIter

/// The elements of a value, as returned by [`iterate`].
///
/// Absent slots of arrays and sequences are yielded as `None`.
pub struct ValueIter<'a>(Inner<'a>);

enum Inner<'a> {
    Done,
    Single(&'a dyn Reflect),
    Snapshot(vec::IntoIter<Option<&'a dyn Reflect>>),
    List(ListItemIter<'a>),
    Set(Box<dyn Iterator<Item = &'a dyn Reflect> + 'a>),
}

impl<'a> Iterator for ValueIter<'a> {
    type Item = Option<&'a dyn Reflect>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            Inner::Done => None,
            Inner::Single(value) => {
                let value = *value;
                self.0 = Inner::Done;
                Some(Some(value))
            }
            Inner::Snapshot(iter) => iter.next(),
            Inner::List(iter) => iter.next(),
            Inner::Set(iter) => iter.next().map(Some),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.0 {
            Inner::Done => (0, Some(0)),
            Inner::Single(_) => (1, Some(1)),
            Inner::Snapshot(iter) => iter.size_hint(),
            Inner::List(iter) => iter.size_hint(),
            Inner::Set(iter) => iter.size_hint(),
        }
    }
}

// -----------------------------------------------------------------------------
// Writes

/// Replaces the element at `index` of the unwrapped value.
///
/// The value is coerced to the element type of typed arrays and sequences.
/// A container holding nothing is left untouched.
///
/// # Errors
///
/// - [`ReflectError::IndexOutOfBounds`] past the end of an array or sequence.
/// - [`ReflectError::Conversion`] if the value is not an element.
/// - [`ReflectError::Unsupported`] on unordered collections and scalars.
pub fn set(
    value: &mut dyn Reflect,
    index: usize,
    item: Option<Box<dyn Reflect>>,
) -> Result<(), ReflectError> {
    let Some(target) = unwrap_mut(value) else {
        return Ok(());
    };
    let info = target.reflect_type_info();
    match target.reflect_mut() {
        ReflectMut::Array(array) => array.set(index, item),
        ReflectMut::List(list) => list.set(index, item),
        ReflectMut::Set(_) | ReflectMut::Container(_) | ReflectMut::Opaque(_) => {
            Err(ReflectError::unsupported("set an element of", info))
        }
    }
}

/// Removes the element at `index` of the unwrapped value, returning the
/// unwrapped value.
///
/// Arrays swap in a shorter allocation. Sequences and unordered
/// collections ignore an index past the end.
///
/// # Examples
///
/// ```
/// use np_reflect::{Reflect, access};
///
/// let mut array = vec![10_i32, 20, 30].into_boxed_slice();
/// access::remove(Some(array.as_reflect_mut()), 1).unwrap();
///
/// assert_eq!(&*array, &[10, 30]);
/// ```
///
/// # Errors
///
/// [`ReflectError::IndexOutOfBounds`] past the end of an array, and
/// [`ReflectError::Unsupported`] on scalars.
pub fn remove(
    value: Option<&mut dyn Reflect>,
    index: usize,
) -> Result<Option<&mut dyn Reflect>, ReflectError> {
    let Some(target) = value.and_then(unwrap_mut) else {
        return Ok(None);
    };
    let info = target.reflect_type_info();
    match target.reflect_mut() {
        ReflectMut::Array(array) => array.remove(index)?,
        ReflectMut::List(list) => {
            if list.remove(index).is_none() {
                trace!("remove: index {index} is past the end of `{}`", info.type_path());
            }
        }
        ReflectMut::Set(set) => {
            let mut position = 0;
            set.retain(&mut |_| {
                let keep = position != index;
                position += 1;
                keep
            });
        }
        ReflectMut::Container(_) | ReflectMut::Opaque(_) => {
            return Err(ReflectError::unsupported("remove an element of", info));
        }
    }
    Ok(Some(target))
}

/// Grows `value` to `len` elements, returning it.
///
/// Arrays swap in a longer allocation whose new slots hold the element
/// type's zero value; sequences are padded with absence (typed sequences
/// store their zero value). A sequence already longer is left as is.
/// Containers are not unwrapped.
///
/// # Examples
///
/// ```
/// use np_reflect::{Reflect, access};
///
/// let mut array = vec![10_i32, 20, 30].into_boxed_slice();
/// access::expand(Some(array.as_reflect_mut()), 5).unwrap();
///
/// assert_eq!(&*array, &[10, 20, 30, 0, 0]);
/// assert!(access::expand(Some(array.as_reflect_mut()), 2).is_err());
/// ```
///
/// # Errors
///
/// - [`ReflectError::Shrink`] if an array would get shorter.
/// - [`ReflectError::Unsupported`] on anything but arrays and sequences.
pub fn expand(
    value: Option<&mut dyn Reflect>,
    len: usize,
) -> Result<Option<&mut dyn Reflect>, ReflectError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let info = value.reflect_type_info();
    match value.reflect_mut() {
        ReflectMut::Array(array) => {
            if len < array.len() {
                return Err(ReflectError::Shrink {
                    type_path: info.type_path(),
                    len: array.len(),
                    requested: len,
                });
            }
            array.reallocate(len);
        }
        ReflectMut::List(list) => {
            while list.len() < len {
                list.push(None)?;
            }
        }
        ReflectMut::Set(_) | ReflectMut::Container(_) | ReflectMut::Opaque(_) => {
            return Err(ReflectError::unsupported("expand", info));
        }
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{expand, get, iterate, length, remove, set};
    use crate::ops::{Deferred, DynamicList, List};
    use crate::{ErrorKind, Reflect, ReflectError};

    fn letters() -> BTreeSet<String> {
        ["a", "b", "c"].into_iter().map(String::from).collect()
    }

    fn text(value: Option<&dyn Reflect>) -> Option<&str> {
        value?.downcast_ref::<String>().map(String::as_str)
    }

    #[test]
    fn array_scenario() {
        let mut array: Box<[i32]> = vec![10, 20, 30].into_boxed_slice();

        assert!(get(Some(array.as_reflect()), 5).is_none());
        assert_eq!(get(Some(array.as_reflect()), 2).and_then(|v| v.downcast_ref::<i32>()), Some(&30));

        let removed = remove(Some(array.as_reflect_mut()), 1).unwrap();
        assert_eq!(removed.map(|v| length(Some(&*v))), Some(2));
        assert_eq!(&*array, &[10, 30]);

        expand(Some(array.as_reflect_mut()), 4).unwrap();
        assert_eq!(&*array, &[10, 30, 0, 0]);
        assert_eq!(length(Some(array.as_reflect())), 4);
    }

    #[test]
    fn array_writes_are_coerced() {
        let mut array: Box<[i32]> = vec![0; 2].into_boxed_slice();

        set(&mut array, 1, Some(Box::new(String::from("7")))).unwrap();
        assert_eq!(&*array, &[0, 7]);

        let error = set(&mut array, 1, Some(Box::new(String::from("x")))).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Conversion);
        let error = set(&mut array, 2, None).unwrap_err();
        assert!(matches!(error, ReflectError::IndexOutOfBounds { index: 2, len: 2 }));
    }

    #[test]
    fn unordered_scenario() {
        let mut set_value = letters();

        assert_eq!(text(get(Some(set_value.as_reflect()), 1)), Some("b"));
        assert!(get(Some(set_value.as_reflect()), 3).is_none());

        remove(Some(set_value.as_reflect_mut()), 5).unwrap();
        assert_eq!(set_value, letters());

        remove(Some(set_value.as_reflect_mut()), 0).unwrap();
        assert_eq!(set_value.iter().map(String::as_str).collect::<Vec<_>>(), ["b", "c"]);

        let error = set(&mut set_value, 0, None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unsupported);
        assert!(expand(Some(set_value.as_reflect_mut()), 9).is_err());
    }

    #[test]
    fn sequences_are_strict_on_write() {
        let mut list: DynamicList = [1_i32].into_iter().collect();

        let error = set(&mut list, 1, None).unwrap_err();
        assert!(matches!(error, ReflectError::IndexOutOfBounds { index: 1, len: 1 }));

        remove(Some(list.as_reflect_mut()), 4).unwrap();
        assert_eq!(list.len(), 1);

        expand(Some(list.as_reflect_mut()), 3).unwrap();
        expand(Some(list.as_reflect_mut()), 2).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.get(2).is_none());
    }

    #[test]
    fn typed_sequences_pad_with_zero() {
        let mut list: Vec<u8> = vec![1];

        expand(Some(list.as_reflect_mut()), 3).unwrap();
        assert_eq!(list, [1, 0, 0]);
    }

    #[test]
    fn scalars_are_single_elements() {
        let value = String::from("only");

        assert_eq!(length(Some(value.as_reflect())), 1);
        assert_eq!(length(None), 0);
        assert_eq!(text(get(Some(value.as_reflect()), 4)), Some("only"));

        let items: Vec<_> = iterate(Some(value.as_reflect())).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(iterate(None).count(), 0);

        let mut scalar = 1_u8;
        assert!(remove(Some(scalar.as_reflect_mut()), 0).is_err());
        assert!(set(&mut scalar, 0, None).is_err());
        assert!(remove(None, 0).unwrap().is_none());
        assert!(expand(None, 3).unwrap().is_none());
    }

    #[test]
    fn containers_are_unwrapped_for_indexed_access() {
        let mut wrapped = Deferred::of(letters());

        assert_eq!(length(Some(wrapped.as_reflect())), 3);
        assert_eq!(text(get(Some(wrapped.as_reflect()), 2)), Some("c"));
        assert_eq!(iterate(Some(wrapped.as_reflect())).count(), 1);
        assert!(expand(Some(wrapped.as_reflect_mut()), 5).is_err());

        let mut empty = Deferred::new(None);
        assert_eq!(length(Some(empty.as_reflect())), 0);
        assert!(set(&mut empty, 0, Some(Box::new(1_u8))).is_ok());
    }

    #[test]
    fn iterate_yields_holes_and_snapshots() {
        let list: DynamicList = [Some(1_u8.into_boxed_reflect()), None].into_iter().collect();
        let slots: Vec<bool> = iterate(Some(list.as_reflect())).map(|v| v.is_some()).collect();
        assert_eq!(slots, [true, false]);

        let array = vec![1_u8, 2, 3].into_boxed_slice();
        let iter = iterate(Some(array.as_reflect()));
        assert_eq!(iter.size_hint(), (3, Some(3)));
        assert_eq!(iter.flatten().filter_map(|v| v.downcast_ref::<u8>()).sum::<u8>(), 6);

        let set_value = letters();
        assert_eq!(iterate(Some(set_value.as_reflect())).count(), 3);
    }
}
