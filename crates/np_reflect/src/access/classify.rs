use crate::Reflect;
use crate::info::{ReflectKind, TypeInfo};
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Unwrapping

/// Replaces containers by their held value until a non-container is reached.
///
/// # Examples
///
/// ```
/// use np_reflect::access::unwrap;
/// use np_reflect::ops::Deferred;
/// use np_reflect::Reflect;
///
/// let nested = Deferred::of(Deferred::lazy(|| Some(Box::new(5_u8))));
///
/// let value = unwrap(Some(nested.as_reflect())).unwrap();
/// assert_eq!(value.downcast_ref::<u8>(), Some(&5));
/// assert!(unwrap(Some(Deferred::new(None).as_reflect())).is_none());
/// ```
pub fn unwrap(mut value: Option<&dyn Reflect>) -> Option<&dyn Reflect> {
    while let Some(ReflectRef::Container(container)) = value.map(|v| v.reflect_ref()) {
        value = container.value();
    }
    value
}

/// Mutable counterpart of [`unwrap`].
pub fn unwrap_mut(mut value: &mut dyn Reflect) -> Option<&mut dyn Reflect> {
    loop {
        if value.reflect_kind() != ReflectKind::Container {
            return Some(value);
        }
        match value.reflect_mut() {
            ReflectMut::Container(container) => value = container.value_mut()?,
            _ => return None,
        }
    }
}

// -----------------------------------------------------------------------------
// CollectionShape

/// The structural category of a value, deciding which access operations
/// are valid on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionShape {
    Array,
    OrderedSequence,
    UnorderedCollection,
    /// Any single value, including a container that was not unwrapped.
    Scalar,
}

impl CollectionShape {
    /// The shape of `value` as it is, without unwrapping.
    #[inline]
    pub fn of(value: &dyn Reflect) -> Self {
        match value.reflect_kind() {
            ReflectKind::Array => Self::Array,
            ReflectKind::List => Self::OrderedSequence,
            ReflectKind::Set => Self::UnorderedCollection,
            ReflectKind::Container | ReflectKind::Opaque => Self::Scalar,
        }
    }

    #[inline]
    pub fn is_collection(self) -> bool {
        !matches!(self, Self::Scalar)
    }
}

/// Returns `true` if the unwrapped value is an array or a collection.
///
/// Absence is not a collection.
#[inline]
pub fn is_collection(value: Option<&dyn Reflect>) -> bool {
    unwrap(value).is_some_and(|value| CollectionShape::of(value).is_collection())
}

// -----------------------------------------------------------------------------
// TypeHint

/// What a static type says about whether its values are collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeHint {
    AlwaysCollection,
    NeverCollection,
    /// Only the runtime type of an instance can tell.
    MaybeCollection,
}

/// Classifies a type before any instance of it exists.
///
/// Array and collection capability are checked before primitivity and
/// finality: a final type can still be a collection.
///
/// # Examples
///
/// ```
/// use np_reflect::access::{TypeHint, classify_type};
/// use np_reflect::info::Typed;
///
/// assert_eq!(classify_type(<Vec<u8>>::type_info()), TypeHint::AlwaysCollection);
/// assert_eq!(classify_type(u8::type_info()), TypeHint::NeverCollection);
/// assert_eq!(classify_type(String::type_info()), TypeHint::NeverCollection);
/// ```
pub fn classify_type(info: &TypeInfo) -> TypeHint {
    if info.is_array() || info.is_collection() {
        TypeHint::AlwaysCollection
    } else if info.is_primitive() {
        TypeHint::NeverCollection
    } else if info.is_interface() {
        TypeHint::MaybeCollection
    } else if info.is_final() {
        TypeHint::NeverCollection
    } else {
        TypeHint::MaybeCollection
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;

    use super::{CollectionShape, TypeHint, classify_type, is_collection, unwrap_mut};
    use crate::Reflect;
    use crate::info::{NonGenericTypeInfoCell, TypeFlags, TypeInfo, Typed};
    use crate::ops::{Container, Deferred, DynamicArray};

    trait Bag {}
    trait Shape {}

    impl Typed for dyn Bag {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::interface::<Self>().with_flags(TypeFlags::COLLECTION))
        }
    }

    impl Typed for dyn Shape {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(TypeInfo::interface::<Self>)
        }
    }

    struct Sealed;

    impl Typed for Sealed {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::class::<Self>()
                    .with_flags(TypeFlags::FINAL)
                    .with_interface(<dyn Bag as Typed>::type_info())
            })
        }
    }

    struct Open;

    impl Typed for Open {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(TypeInfo::class::<Self>)
        }
    }

    #[test]
    fn type_hints() {
        assert_eq!(classify_type(Sealed::type_info()), TypeHint::AlwaysCollection);
        assert_eq!(classify_type(DynamicArray::type_info()), TypeHint::AlwaysCollection);
        assert_eq!(classify_type(<dyn Bag as Typed>::type_info()), TypeHint::AlwaysCollection);
        assert_eq!(classify_type(<dyn Shape as Typed>::type_info()), TypeHint::MaybeCollection);
        assert_eq!(classify_type(Open::type_info()), TypeHint::MaybeCollection);
        assert_eq!(classify_type(bool::type_info()), TypeHint::NeverCollection);
        assert_eq!(
            classify_type(Open::type_info()),
            classify_type(Open::type_info())
        );
    }

    #[test]
    fn instances() {
        let set: BTreeSet<u8> = BTreeSet::new();
        let wrapped = Deferred::of(set);

        assert!(is_collection(Some(wrapped.as_reflect())));
        assert!(!is_collection(Some(1_u8.as_reflect())));
        assert!(!is_collection(None));
        assert!(!is_collection(Some(Deferred::new(None).as_reflect())));
        assert_eq!(CollectionShape::of(wrapped.as_reflect()), CollectionShape::Scalar);
    }

    #[test]
    fn unwrap_mut_reaches_the_value() {
        let mut wrapped = Deferred::of(Deferred::of(1_i32));

        if let Some(value) = unwrap_mut(&mut wrapped).and_then(|v| v.downcast_mut::<i32>()) {
            *value = 2;
        }
        let inner = wrapped.value().and_then(|v| v.reflect_ref().as_container());
        assert_eq!(
            inner.and_then(|c| c.value()).and_then(|v| v.downcast_ref::<i32>()),
            Some(&2)
        );

        wrapped.set_value(None);
        assert!(unwrap_mut(&mut wrapped).is_none());
        assert!(unwrap_mut(&mut 3_u8).is_some());
    }
}
