//! Reflection for standard types, and helpers for implementing [`Reflect`].
//!
//! - scalars: `bool`, `char`, `i8`-`i128`, `u8`-`u128`, `isize`, `usize`,
//!   `f32`, `f64` and `String`.
//! - arrays: `Box<[T]>`.
//! - ordered sequences: `Vec<T>`, `VecDeque<T>`.
//! - unordered collections: `BTreeSet<T>`, `np_utils::hash::HashSet<T>`.
//!
//! `xxx_debug` and `xxx_partial_eq` implement [`Reflect::reflect_debug`]
//! and [`Reflect::reflect_partial_eq`] for each shape.

// -----------------------------------------------------------------------------
// Modules

mod primitives;
mod sequences;
mod sets;

// -----------------------------------------------------------------------------
// Helpers

use alloc::boxed::Box;
use core::fmt;

use crate::info::Typed;
use crate::ops::{Array, Container, List, ReflectRef, Set};
use crate::{ConversionError, FromReflect, Reflect};

/// Takes a value written into a typed collection.
///
/// Values of another type go through the element type's converter.
pub(crate) fn take_element<T>(value: Box<dyn Reflect>) -> Result<T, ConversionError>
where
    T: FromReflect + Typed,
{
    T::take_from_reflect(value).or_else(|value| {
        T::type_info()
            .convert(&*value)
            .and_then(|converted| T::take_from_reflect(converted).ok())
            .ok_or_else(|| ConversionError::new(value.reflect_type_info(), T::type_info()))
    })
}

/// Like [`take_element`], absence becomes the zero value.
pub(crate) fn take_item<T>(value: Option<Box<dyn Reflect>>) -> Result<T, ConversionError>
where
    T: FromReflect + Typed + Default,
{
    value.map_or_else(|| Ok(T::default()), take_element)
}

struct Slot<'a>(Option<&'a dyn Reflect>);

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.reflect_debug(f),
            None => f.write_str("None"),
        }
    }
}

fn slots_eq<'a, 'b>(
    mut lhs: impl Iterator<Item = Option<&'a dyn Reflect>>,
    mut rhs: impl Iterator<Item = Option<&'b dyn Reflect>>,
) -> Option<bool> {
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return Some(true),
            (Some(None), Some(None)) => {}
            (Some(Some(a)), Some(Some(b))) => {
                if !a.reflect_partial_eq(b)? {
                    return Some(false);
                }
            }
            _ => return Some(false),
        }
    }
}

pub fn array_debug(array: &dyn Array, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(array.iter().map(Slot)).finish()
}

pub fn list_debug(list: &dyn List, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(list.iter().map(Slot)).finish()
}

pub fn set_debug(set: &dyn Set, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set()
        .entries(set.iter().map(|value| Slot(Some(value))))
        .finish()
}

pub fn container_debug(container: &dyn Container, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}(", container.reflect_type_info().name())?;
    fmt::Debug::fmt(&Slot(container.value()), f)?;
    write!(f, ")")
}

/// Compares an array with any other array, slot by slot.
pub fn array_partial_eq(array: &dyn Array, other: &dyn Reflect) -> Option<bool> {
    let ReflectRef::Array(other) = other.reflect_ref() else {
        return Some(false);
    };
    if array.len() != other.len() {
        return Some(false);
    }
    slots_eq(array.iter(), other.iter())
}

/// Compares a list with any other list, slot by slot.
pub fn list_partial_eq(list: &dyn List, other: &dyn Reflect) -> Option<bool> {
    let ReflectRef::List(other) = other.reflect_ref() else {
        return Some(false);
    };
    if list.len() != other.len() {
        return Some(false);
    }
    slots_eq(list.iter(), other.iter())
}

/// Compares two sets by membership.
pub fn set_partial_eq(set: &dyn Set, other: &dyn Reflect) -> Option<bool> {
    let ReflectRef::Set(other) = other.reflect_ref() else {
        return Some(false);
    };
    Some(set.len() == other.len() && set.iter().all(|value| other.contains(value)))
}
