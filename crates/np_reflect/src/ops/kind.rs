use crate::Reflect;
use crate::info::ReflectKind;
use crate::ops::{Array, Container, List, Set};

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable view of a value's shape.
///
/// Obtained via [`Reflect::reflect_ref`].
pub enum ReflectRef<'a> {
    Array(&'a dyn Array),
    List(&'a dyn List),
    Set(&'a dyn Set),
    Container(&'a dyn Container),
    Opaque(&'a dyn Reflect),
}

impl<'a> ReflectRef<'a> {
    #[inline]
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Array(_) => ReflectKind::Array,
            Self::List(_) => ReflectKind::List,
            Self::Set(_) => ReflectKind::Set,
            Self::Container(_) => ReflectKind::Container,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    #[inline]
    pub fn as_array(self) -> Option<&'a dyn Array> {
        match self {
            Self::Array(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(self) -> Option<&'a dyn List> {
        match self {
            Self::List(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_set(self) -> Option<&'a dyn Set> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_container(self) -> Option<&'a dyn Container> {
        match self {
            Self::Container(value) => Some(value),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable view of a value's shape.
///
/// Obtained via [`Reflect::reflect_mut`].
pub enum ReflectMut<'a> {
    Array(&'a mut dyn Array),
    List(&'a mut dyn List),
    Set(&'a mut dyn Set),
    Container(&'a mut dyn Container),
    Opaque(&'a mut dyn Reflect),
}

impl<'a> ReflectMut<'a> {
    #[inline]
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Array(_) => ReflectKind::Array,
            Self::List(_) => ReflectKind::List,
            Self::Set(_) => ReflectKind::Set,
            Self::Container(_) => ReflectKind::Container,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    #[inline]
    pub fn as_array(self) -> Option<&'a mut dyn Array> {
        match self {
            Self::Array(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(self) -> Option<&'a mut dyn List> {
        match self {
            Self::List(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_set(self) -> Option<&'a mut dyn Set> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub fn as_container(self) -> Option<&'a mut dyn Container> {
        match self {
            Self::Container(value) => Some(value),
            _ => None,
        }
    }
}
