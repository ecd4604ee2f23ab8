use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;

use crate::impls::take_item;
use crate::info::{GenericTypeInfoCell, TypeFlags, TypeInfo, Typed};
use crate::ops::{Array, List};
use crate::{FromReflect, Reflect, ReflectError};

#[inline]
fn check_index(index: usize, len: usize) -> Result<(), ReflectError> {
    if index < len {
        Ok(())
    } else {
        Err(ReflectError::IndexOutOfBounds { index, len })
    }
}

fn from_slots<'a, T, C>(slots: impl Iterator<Item = Option<&'a dyn Reflect>>) -> Option<C>
where
    T: FromReflect + Default,
    C: FromIterator<T>,
{
    slots
        .map(|slot| match slot {
            Some(value) => T::from_reflect(value),
            None => Some(T::default()),
        })
        .collect()
}

// -----------------------------------------------------------------------------
// Box<[T]>

impl<T: FromReflect + Typed + Default> Typed for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::array::<Self>(Some(T::type_info())))
    }
}

impl<T: FromReflect + Typed + Default> Reflect for Box<[T]> {
    crate::reflection::impl_reflect_cast_fn!(Array);

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        crate::impls::array_partial_eq(self, other)
    }

    #[inline]
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::impls::array_debug(self, f)
    }
}

impl<T: FromReflect + Typed + Default> Array for Box<[T]> {
    #[inline]
    fn item_info(&self) -> Option<&'static TypeInfo> {
        Some(T::type_info())
    }

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(Reflect::as_reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(Reflect::as_reflect_mut)
    }

    fn set(&mut self, index: usize, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError> {
        check_index(index, <[T]>::len(self))?;
        self[index] = take_item(value)?;
        Ok(())
    }

    fn reallocate(&mut self, len: usize) {
        let mut values = core::mem::take(self).into_vec();
        values.resize_with(len, T::default);
        *self = values.into_boxed_slice();
    }

    fn remove(&mut self, index: usize) -> Result<(), ReflectError> {
        check_index(index, <[T]>::len(self))?;
        let mut values = core::mem::take(self).into_vec();
        values.remove(index);
        *self = values.into_boxed_slice();
        Ok(())
    }
}

impl<T: FromReflect + Typed + Default> FromReflect for Box<[T]> {
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
        let array = reflect.reflect_ref().as_array()?;
        from_slots::<T, Self>(array.iter())
    }
}

// -----------------------------------------------------------------------------
// Vec<T>

impl<T: FromReflect + Typed + Default> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::class::<Self>().with_flags(TypeFlags::FINAL | TypeFlags::COLLECTION)
        })
    }
}

impl<T: FromReflect + Typed + Default> Reflect for Vec<T> {
    crate::reflection::impl_reflect_cast_fn!(List);

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        crate::impls::list_partial_eq(self, other)
    }

    #[inline]
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::impls::list_debug(self, f)
    }
}

impl<T: FromReflect + Typed + Default> List for Vec<T> {
    #[inline]
    fn item_info(&self) -> Option<&'static TypeInfo> {
        Some(T::type_info())
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(Reflect::as_reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(Reflect::as_reflect_mut)
    }

    fn set(&mut self, index: usize, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError> {
        check_index(index, Vec::len(self))?;
        self[index] = take_item(value)?;
        Ok(())
    }

    fn push(&mut self, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError> {
        Vec::push(self, take_item(value)?);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Option<Box<dyn Reflect>> {
        if index < Vec::len(self) {
            Some(Vec::remove(self, index).into_boxed_reflect())
        } else {
            None
        }
    }
}

impl<T: FromReflect + Typed + Default> FromReflect for Vec<T> {
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
        let list = reflect.reflect_ref().as_list()?;
        from_slots::<T, Self>(list.iter())
    }
}

// -----------------------------------------------------------------------------
// VecDeque<T>

impl<T: FromReflect + Typed + Default> Typed for VecDeque<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::class::<Self>().with_flags(TypeFlags::FINAL | TypeFlags::COLLECTION)
        })
    }
}

impl<T: FromReflect + Typed + Default> Reflect for VecDeque<T> {
    crate::reflection::impl_reflect_cast_fn!(List);

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        crate::impls::list_partial_eq(self, other)
    }

    #[inline]
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::impls::list_debug(self, f)
    }
}

impl<T: FromReflect + Typed + Default> List for VecDeque<T> {
    #[inline]
    fn item_info(&self) -> Option<&'static TypeInfo> {
        Some(T::type_info())
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(Reflect::as_reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        VecDeque::get_mut(self, index).map(Reflect::as_reflect_mut)
    }

    fn set(&mut self, index: usize, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError> {
        check_index(index, VecDeque::len(self))?;
        self[index] = take_item(value)?;
        Ok(())
    }

    fn push(&mut self, value: Option<Box<dyn Reflect>>) -> Result<(), ReflectError> {
        VecDeque::push_back(self, take_item(value)?);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Option<Box<dyn Reflect>> {
        VecDeque::remove(self, index).map(Reflect::into_boxed_reflect)
    }
}

impl<T: FromReflect + Typed + Default> FromReflect for VecDeque<T> {
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
        let list = reflect.reflect_ref().as_list()?;
        from_slots::<T, Self>(list.iter())
    }
}
