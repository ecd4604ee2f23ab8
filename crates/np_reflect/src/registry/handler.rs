use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::error::Error;
use core::fmt;

use crate::{Reflect, ReflectError};

// -----------------------------------------------------------------------------
// DynamicPropertyHandler

/// Name-based property access for values that declare no accessors.
///
/// One instance serves every value of the types bound to it, so handlers
/// keep no per-value state.
pub trait DynamicPropertyHandler: Send + Sync + 'static {
    /// Constructs the handler. Called at most once per registry.
    fn create() -> Result<Self, Box<dyn Error + Send + Sync>>
    where
        Self: Sized;

    /// The names of the properties `object` currently has.
    fn property_names(&self, object: &dyn Reflect) -> Vec<String>;

    fn get_property<'a>(&self, object: &'a dyn Reflect, name: &str) -> Option<&'a dyn Reflect>;

    fn get_property_mut<'a>(
        &self,
        object: &'a mut dyn Reflect,
        name: &str,
    ) -> Option<&'a mut dyn Reflect>;

    /// Sets property `name` of `object`, creating it if needed.
    fn set_property(
        &self,
        object: &mut dyn Reflect,
        name: &str,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<(), ReflectError>;
}

// -----------------------------------------------------------------------------
// HandlerBinding

/// A type-erased reference to a handler type and its constructor.
#[derive(Clone, Copy)]
pub struct HandlerBinding {
    type_id: TypeId,
    type_path: &'static str,
    create: fn() -> Result<HandlerEntry, ReflectError>,
}

impl HandlerBinding {
    #[inline]
    pub fn of<H: DynamicPropertyHandler>() -> Self {
        Self {
            type_id: TypeId::of::<H>(),
            type_path: type_name::<H>(),
            create: HandlerEntry::create::<H>,
        }
    }

    /// The [`TypeId`] of the handler type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub(super) fn create(&self) -> Result<HandlerEntry, ReflectError> {
        (self.create)()
    }
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerBinding({})", self.type_path)
    }
}

// -----------------------------------------------------------------------------
// HandlerEntry

/// A created handler, viewed both as itself and as a trait object.
#[derive(Clone)]
pub(super) struct HandlerEntry {
    pub any: Arc<dyn Any + Send + Sync>,
    pub handler: Arc<dyn DynamicPropertyHandler>,
}

impl HandlerEntry {
    fn create<H: DynamicPropertyHandler>() -> Result<Self, ReflectError> {
        let handler = H::create().map_err(|source| ReflectError::HandlerInit {
            handler: type_name::<H>(),
            source,
        })?;
        let handler = Arc::new(handler);
        Ok(Self {
            any: handler.clone(),
            handler,
        })
    }
}
