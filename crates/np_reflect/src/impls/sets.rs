use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use core::fmt;
use core::hash::Hash;

use np_utils::hash::HashSet;

use crate::impls::take_element;
use crate::info::{GenericTypeInfoCell, TypeFlags, TypeInfo, Typed};
use crate::ops::Set;
use crate::{FromReflect, Reflect, ReflectError};

macro_rules! impl_reflect_set {
    ($ty:ident, $($bound:tt)+) => {
        impl<T: FromReflect + Typed + $($bound)+> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::class::<Self>().with_flags(TypeFlags::FINAL | TypeFlags::COLLECTION)
                })
            }
        }

        impl<T: FromReflect + Typed + $($bound)+> Reflect for $ty<T> {
            crate::reflection::impl_reflect_cast_fn!(Set);

            #[inline]
            fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
                crate::impls::set_partial_eq(self, other)
            }

            #[inline]
            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                crate::impls::set_debug(self, f)
            }
        }

        impl<T: FromReflect + Typed + $($bound)+> Set for $ty<T> {
            #[inline]
            fn item_info(&self) -> Option<&'static TypeInfo> {
                Some(T::type_info())
            }

            #[inline]
            fn len(&self) -> usize {
                Self::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(Self::iter(self).map(Reflect::as_reflect))
            }

            fn contains(&self, value: &dyn Reflect) -> bool {
                let mut from_reflect = None;
                value
                    .downcast_ref::<T>()
                    .or_else(|| {
                        from_reflect = T::from_reflect(value);
                        from_reflect.as_ref()
                    })
                    .is_some_and(|value| Self::contains(self, value))
            }

            fn insert(&mut self, value: Box<dyn Reflect>) -> Result<bool, ReflectError> {
                let value = take_element::<T>(value)?;
                Ok(Self::insert(self, value))
            }

            fn retain(&mut self, f: &mut dyn FnMut(&dyn Reflect) -> bool) {
                Self::retain(self, |v| f(v));
            }
        }

        impl<T: FromReflect + Typed + $($bound)+> FromReflect for $ty<T> {
            fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
                let set = reflect.reflect_ref().as_set()?;
                set.iter().map(T::from_reflect).collect()
            }
        }
    };
}

impl_reflect_set!(BTreeSet, Ord);
impl_reflect_set!(HashSet, Hash + Eq);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;
    use alloc::format;
    use alloc::vec::Vec;

    use np_utils::hash::HashSet;

    use crate::info::Typed;
    use crate::ops::Set;
    use crate::{Reflect, ReflectError};

    #[test]
    fn btree_set_traversal_is_sorted() {
        let set: BTreeSet<i32> = [3, 1, 2].into_iter().collect();
        let items: Vec<_> = Set::iter(&set)
            .filter_map(|v| v.downcast_ref::<i32>().copied())
            .collect();

        assert_eq!(items, [1, 2, 3]);
        assert!(<BTreeSet<i32> as Typed>::type_info().is_collection());
        assert_eq!(format!("{:?}", set.as_reflect()), "{1, 2, 3}");
    }

    #[test]
    fn insert_converts_or_fails() {
        let mut set: HashSet<u8> = HashSet::default();

        assert!(Set::insert(&mut set, Box::new(4_i64)).unwrap());
        assert!(!Set::insert(&mut set, Box::new(4_u8)).unwrap());
        assert!(Set::contains(&set, &4_u8));

        let error = Set::insert(&mut set, Box::new(300_i32)).unwrap_err();
        assert!(matches!(error, ReflectError::Conversion(_)));
    }

    #[test]
    fn retain_sees_every_element() {
        let mut set: BTreeSet<u8> = [1, 2, 3, 4].into_iter().collect();
        Set::retain(&mut set, &mut |v| v.downcast_ref::<u8>().is_some_and(|v| v % 2 == 0));

        assert_eq!(set.into_iter().collect::<Vec<_>>(), [2, 4]);
    }
}
