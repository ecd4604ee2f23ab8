use alloc::boxed::Box;
use core::fmt;
use std::sync::OnceLock;

use crate::Reflect;
use crate::info::{NonGenericTypeInfoCell, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Container

/// A single-valued holder that must be unwrapped to reach its value.
///
/// See [`access::unwrap`](crate::access::unwrap).
pub trait Container: Reflect {
    /// The held value, computing it first if the container is lazy.
    fn value(&self) -> Option<&dyn Reflect>;

    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Replaces the held value.
    fn set_value(&mut self, value: Option<Box<dyn Reflect>>);
}

// -----------------------------------------------------------------------------
// Deferred

type Init = Box<dyn Fn() -> Option<Box<dyn Reflect>> + Send + Sync>;

/// A [`Container`] whose value is either given up front or computed once,
/// on first access.
///
/// # Examples
///
/// ```
/// use np_reflect::ops::{Container, Deferred};
///
/// let lazy = Deferred::lazy(|| Some(Box::new(42_i32)));
/// assert!(!lazy.is_evaluated());
///
/// assert_eq!(lazy.value().and_then(|v| v.downcast_ref::<i32>()), Some(&42));
/// assert!(lazy.is_evaluated());
/// ```
pub struct Deferred {
    cell: OnceLock<Option<Box<dyn Reflect>>>,
    init: Option<Init>,
}

impl Typed for Deferred {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(TypeInfo::class::<Self>)
    }
}

impl Deferred {
    /// A container already holding `value`.
    #[inline]
    pub fn new(value: Option<Box<dyn Reflect>>) -> Self {
        Self {
            cell: OnceLock::from(value),
            init: None,
        }
    }

    /// A container holding `value`.
    #[inline]
    pub fn of<T: Reflect>(value: T) -> Self {
        Self::new(Some(Box::new(value)))
    }

    /// A container computing its value with `f` on first access.
    #[inline]
    pub fn lazy(f: impl Fn() -> Option<Box<dyn Reflect>> + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceLock::new(),
            init: Some(Box::new(f)),
        }
    }

    /// Returns `true` once the value has been computed.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.cell.get().is_some()
    }

    fn force(&self) -> &Option<Box<dyn Reflect>> {
        self.cell
            .get_or_init(|| self.init.as_ref().and_then(|init| init()))
    }
}

impl Reflect for Deferred {
    crate::reflection::impl_reflect_cast_fn!(Container);
}

impl Container for Deferred {
    #[inline]
    fn value(&self) -> Option<&dyn Reflect> {
        self.force().as_deref()
    }

    fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.force();
        match self.cell.get_mut() {
            Some(Some(value)) => Some(&mut **value),
            _ => None,
        }
    }

    fn set_value(&mut self, value: Option<Box<dyn Reflect>>) {
        self.cell = OnceLock::from(value);
        self.init = None;
    }
}

impl fmt::Debug for Deferred {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}
