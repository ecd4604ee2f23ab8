use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock};

use log::debug;
use np_utils::TypeIdMap;

use super::handler::{HandlerBinding, HandlerEntry};
use super::DynamicPropertyHandler;
use crate::ReflectError;
use crate::info::TypeInfo;

/// A shared cache of dynamic property handlers, one instance per handler type.
///
/// Lookups take a read lock. A missing handler is created under the write
/// lock after checking again, so racing first requests still construct
/// exactly one instance. Failed constructions are not cached. Entries are
/// never evicted.
///
/// # Examples
///
/// ```
/// use np_reflect::registry::{HandlerRegistry, MapPropertyHandler, PropertyMap};
/// use np_reflect::info::Typed;
/// use std::sync::Arc;
///
/// let registry = HandlerRegistry::new();
///
/// let first = registry.get::<MapPropertyHandler>().unwrap();
/// let second = registry.get::<MapPropertyHandler>().unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
///
/// let bound = registry.handler_for(PropertyMap::type_info()).unwrap();
/// assert!(bound.is_some());
/// assert_eq!(registry.len(), 1);
/// ```
pub struct HandlerRegistry {
    handlers: RwLock<TypeIdMap<HandlerEntry>>,
}

impl HandlerRegistry {
    #[inline]
    pub const fn new() -> Self {
        Self {
            handlers: RwLock::new(TypeIdMap::new()),
        }
    }

    /// The shared instance of handler type `H`, creating it on first request.
    ///
    /// # Errors
    ///
    /// [`ReflectError::HandlerInit`] if the handler fails to construct.
    pub fn get<H: DynamicPropertyHandler>(&self) -> Result<Arc<H>, ReflectError> {
        let entry = self.entry(HandlerBinding::of::<H>())?;
        Ok(entry
            .any
            .downcast::<H>()
            .unwrap_or_else(|_| unreachable!("handlers are keyed by their own type id")))
    }

    /// The handler bound to the type described by `info`, if any.
    ///
    /// # Errors
    ///
    /// [`ReflectError::HandlerInit`] if the handler fails to construct.
    pub fn handler_for(
        &self,
        info: &TypeInfo,
    ) -> Result<Option<Arc<dyn DynamicPropertyHandler>>, ReflectError> {
        info.dynamic_handler()
            .map(|binding| self.entry(binding).map(|entry| entry.handler))
            .transpose()
    }

    /// Returns `true` if handler type `H` has been created.
    #[inline]
    pub fn contains<H: DynamicPropertyHandler>(&self) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_type::<H>()
    }

    /// The number of handlers created so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, binding: HandlerBinding) -> Result<HandlerEntry, ReflectError> {
        if let Some(entry) = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&binding.type_id())
        {
            return Ok(entry.clone());
        }

        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .try_get_or_insert(binding.type_id(), || {
                debug!("creating dynamic property handler `{}`", binding.type_path());
                binding.create()
            })
            .cloned()
    }
}

impl Default for HandlerRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::error::Error;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::HandlerRegistry;
    use crate::registry::DynamicPropertyHandler;
    use crate::{ErrorKind, Reflect, ReflectError};

    macro_rules! inert_handler {
        () => {
            fn property_names(&self, _: &dyn Reflect) -> Vec<String> {
                Vec::new()
            }

            fn get_property<'a>(&self, _: &'a dyn Reflect, _: &str) -> Option<&'a dyn Reflect> {
                None
            }

            fn get_property_mut<'a>(
                &self,
                _: &'a mut dyn Reflect,
                _: &str,
            ) -> Option<&'a mut dyn Reflect> {
                None
            }

            fn set_property(
                &self,
                _: &mut dyn Reflect,
                _: &str,
                _: Option<Box<dyn Reflect>>,
            ) -> Result<(), ReflectError> {
                Ok(())
            }
        };
    }

    static CREATED: AtomicUsize = AtomicUsize::new(0);
    static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

    struct Counting;

    impl DynamicPropertyHandler for Counting {
        fn create() -> Result<Self, Box<dyn Error + Send + Sync>> {
            CREATED.fetch_add(1, Ordering::SeqCst);
            thread::yield_now();
            Ok(Self)
        }

        inert_handler!();
    }

    #[derive(Debug)]
    struct Failing;

    impl DynamicPropertyHandler for Failing {
        fn create() -> Result<Self, Box<dyn Error + Send + Sync>> {
            ATTEMPTS.fetch_add(1, Ordering::SeqCst);
            Err("no configuration".into())
        }

        inert_handler!();
    }

    #[test]
    fn concurrent_first_use_creates_once() {
        let registry = HandlerRegistry::new();

        let handlers: Vec<Arc<Counting>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.get::<Counting>()))
                .collect();
            workers
                .into_iter()
                .filter_map(|worker| worker.join().ok())
                .collect::<Result<_, _>>()
                .unwrap()
        });

        assert_eq!(handlers.len(), 8);
        assert!(handlers.iter().all(|h| Arc::ptr_eq(h, &handlers[0])));
        assert_eq!(CREATED.load(Ordering::SeqCst), 1);
        assert!(registry.contains::<Counting>());
    }

    #[test]
    fn failed_construction_is_not_cached() {
        let registry = HandlerRegistry::default();

        let error = registry.get::<Failing>().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Binding);
        assert!(matches!(error, ReflectError::HandlerInit { handler, .. } if handler.ends_with("Failing")));

        assert!(registry.get::<Failing>().is_err());
        assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn unbound_types_have_no_handler() {
        let registry = HandlerRegistry::new();

        assert!(registry.handler_for(<u8 as crate::info::Typed>::type_info()).unwrap().is_none());
        assert!(!registry.contains::<Counting>());
    }
}
