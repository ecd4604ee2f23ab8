use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::DynamicTyped;
use crate::info::ReflectKind;
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// A runtime value that the access layer can inspect.
///
/// Every value the access engine and the property resolver touch is a
/// `dyn Reflect`. The trait exposes the value's shape through
/// [`reflect_ref`](Reflect::reflect_ref) / [`reflect_mut`](Reflect::reflect_mut),
/// and its type metadata through [`DynamicTyped`].
///
/// # Implementing
///
/// Scalars, `String`, the standard collections and the dynamic containers
/// are implemented by this crate. Object types implement
/// [`Typed`](crate::info::Typed) by hand, describing their accessor methods,
/// and then use [`impl_reflect_opaque!`](crate::impl_reflect_opaque).
///
/// # Type Identification
///
/// [`Any::type_id`] on a `Box<dyn Reflect>` returns the id of the box.
/// Use [`Reflect::ty_id`] instead:
///
/// ```
/// use np_reflect::Reflect;
/// use core::any::{Any, TypeId};
///
/// let x: Box<dyn Reflect> = 32_i32.into_boxed_reflect();
///
/// assert!(x.type_id() != TypeId::of::<i32>());
/// assert!(x.ty_id() == TypeId::of::<i32>());
/// ```
pub trait Reflect: DynamicTyped + Send + Sync + Any {
    /// Casts this value to `&dyn Reflect`.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this value to `&mut dyn Reflect`.
    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Boxes this value as `Box<dyn Reflect>`.
    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Returns the [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns the shape of this value.
    fn reflect_kind(&self) -> ReflectKind;

    /// Returns an immutable view of this value's shape.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns a mutable view of this value's shape.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Returns a "partial equality" comparison result.
    ///
    /// `None` if the type does not support equality testing.
    #[inline]
    fn reflect_partial_eq(&self, _other: &dyn Reflect) -> Option<bool> {
        None
    }

    /// Debug formatter for the value.
    ///
    /// Opaque values print `Opaque(type_path)` unless overridden.
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::impls;
        match self.reflect_ref() {
            ReflectRef::Array(data) => impls::array_debug(data, f),
            ReflectRef::List(data) => impls::list_debug(data, f),
            ReflectRef::Set(data) => impls::set_debug(data, f),
            ReflectRef::Container(data) => impls::container_debug(data, f),
            ReflectRef::Opaque(_) => write!(f, "Opaque({})", self.reflect_type_info().type_path()),
        }
    }
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// # use np_reflect::Reflect;
    /// let x: Box<dyn Reflect> = 10_i32.into_boxed_reflect();
    ///
    /// assert_eq!(x.downcast_ref::<i32>(), Some(&10));
    /// assert!(x.downcast_ref::<u32>().is_none());
    /// ```
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts a boxed value to type `T`, handing the box back on mismatch.
    ///
    /// # Examples
    ///
    /// ```
    /// # use np_reflect::Reflect;
    /// let x: Box<dyn Reflect> = String::from("a").into_boxed_reflect();
    ///
    /// let x = x.downcast::<u8>().unwrap_err();
    /// assert_eq!(*x.downcast::<String>().unwrap(), "a");
    /// ```
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            let any: Box<dyn Any> = self;
            Ok(any
                .downcast::<T>()
                .unwrap_or_else(|_| unreachable!("the type id was checked above")))
        } else {
            Err(self)
        }
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}

// -----------------------------------------------------------------------------
// Macros

/// Implements `reflect_kind`, `reflect_ref` and `reflect_mut` for a shape.
macro_rules! impl_reflect_cast_fn {
    ($kind:ident) => {
        #[inline]
        fn reflect_kind(&self) -> $crate::info::ReflectKind {
            $crate::info::ReflectKind::$kind
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }
    };
}

pub(crate) use impl_reflect_cast_fn;

/// Implements [`Reflect`] for an opaque object type.
///
/// The type must implement [`Typed`](crate::info::Typed); its properties are
/// reached through the accessor methods its `TypeInfo` declares.
///
/// # Examples
///
/// ```
/// use np_reflect::info::{NonGenericTypeInfoCell, TypeInfo, Typed};
/// use np_reflect::{Reflect, impl_reflect_opaque, info::ReflectKind};
///
/// struct Point {
///     x: i32,
/// }
///
/// impl Typed for Point {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(TypeInfo::class::<Self>)
///     }
/// }
///
/// impl_reflect_opaque!(Point);
///
/// let point = Point { x: 1 };
/// assert_eq!(point.reflect_kind(), ReflectKind::Opaque);
/// assert_eq!(point.as_reflect().downcast_ref::<Point>().map(|p| p.x), Some(1));
/// ```
#[macro_export]
macro_rules! impl_reflect_opaque {
    ($ty:ty) => {
        impl $crate::Reflect for $ty {
            #[inline]
            fn reflect_kind(&self) -> $crate::info::ReflectKind {
                $crate::info::ReflectKind::Opaque
            }

            #[inline]
            fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
                $crate::ops::ReflectRef::Opaque(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
                $crate::ops::ReflectMut::Opaque(self)
            }
        }
    };
}
