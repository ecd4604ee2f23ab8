use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::error::Error;
use core::fmt;

use super::DynamicPropertyHandler;
use crate::info::{NonGenericTypeInfoCell, TypeInfo, Typed};
use crate::{Reflect, ReflectError};

// -----------------------------------------------------------------------------
// PropertyMap

/// A record of named, possibly absent, values.
///
/// Its properties are reached through [`MapPropertyHandler`].
#[derive(Default)]
pub struct PropertyMap {
    values: BTreeMap<String, Option<Box<dyn Reflect>>>,
}

impl Typed for PropertyMap {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::class::<Self>().with_dynamic_handler::<MapPropertyHandler>())
    }
}

impl PropertyMap {
    #[inline]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets `name` to `value`, returning the previous entry.
    #[inline]
    pub fn insert<T: Reflect>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Option<Option<Box<dyn Reflect>>> {
        self.values.insert(name.into(), Some(Box::new(value)))
    }

    /// Sets `name` to a boxed, possibly absent, value.
    #[inline]
    pub fn insert_boxed(
        &mut self,
        name: impl Into<String>,
        value: Option<Box<dyn Reflect>>,
    ) -> Option<Option<Box<dyn Reflect>>> {
        self.values.insert(name.into(), value)
    }

    /// The value of `name`; `None` if it is missing or absent.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&dyn Reflect> {
        self.values.get(name).and_then(Option::as_deref)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        match self.values.get_mut(name) {
            Some(Some(value)) => Some(&mut **value),
            _ => None,
        }
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Option<Box<dyn Reflect>>> {
        self.values.remove(name)
    }

    /// Property names in ascending order.
    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

crate::impl_reflect_opaque!(PropertyMap);

impl fmt::Debug for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.values.iter().map(|(k, v)| (k, v.as_deref())))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MapPropertyHandler

/// Exposes the entries of a [`PropertyMap`] as properties.
///
/// Values of any other type have no properties and reject writes.
///
/// # Examples
///
/// ```
/// use np_reflect::registry::{DynamicPropertyHandler, MapPropertyHandler, PropertyMap};
/// use np_reflect::Reflect;
///
/// let handler = MapPropertyHandler;
/// let mut map = PropertyMap::new();
///
/// handler.set_property(&mut map, "port", Some(Box::new(8080_u16))).unwrap();
/// assert_eq!(handler.property_names(&map), ["port"]);
///
/// let port = handler.get_property(&map, "port").unwrap();
/// assert_eq!(port.downcast_ref::<u16>(), Some(&8080));
/// assert!(handler.set_property(&mut 1_u8, "port", None).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MapPropertyHandler;

impl DynamicPropertyHandler for MapPropertyHandler {
    #[inline]
    fn create() -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self)
    }

    fn property_names(&self, object: &dyn Reflect) -> Vec<String> {
        object
            .downcast_ref::<PropertyMap>()
            .map(|map| map.names().map(String::from).collect())
            .unwrap_or_default()
    }

    fn get_property<'a>(&self, object: &'a dyn Reflect, name: &str) -> Option<&'a dyn Reflect> {
        object.downcast_ref::<PropertyMap>()?.get(name)
    }

    fn get_property_mut<'a>(
        &self,
        object: &'a mut dyn Reflect,
        name: &str,
    ) -> Option<&'a mut dyn Reflect> {
        object.downcast_mut::<PropertyMap>()?.get_mut(name)
    }

    fn set_property(
        &self,
        object: &mut dyn Reflect,
        name: &str,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<(), ReflectError> {
        let info = object.reflect_type_info();
        let map = object
            .downcast_mut::<PropertyMap>()
            .ok_or_else(|| ReflectError::unsupported("set a dynamic property of", info))?;
        map.insert_boxed(name, value);
        Ok(())
    }
}
