use alloc::string::String;

use crate::ReflectError;
use crate::info::{MethodHandle, MethodKind, TypeInfo};

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// The accessors of a named property.
///
/// A descriptor always carries at least one accessor. The property type
/// is what written values are coerced to; the indexed type is the element
/// type for indexed writes.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    read: Option<MethodHandle>,
    write: Option<MethodHandle>,
    indexed_read: Option<MethodHandle>,
    indexed_write: Option<MethodHandle>,
    property_type: Option<&'static TypeInfo>,
    indexed_type: Option<&'static TypeInfo>,
}

impl PropertyDescriptor {
    #[inline]
    pub fn builder(name: impl Into<String>) -> PropertyDescriptorBuilder {
        PropertyDescriptorBuilder {
            descriptor: Self {
                name: name.into(),
                read: None,
                write: None,
                indexed_read: None,
                indexed_write: None,
                property_type: None,
                indexed_type: None,
            },
        }
    }

    /// Assembles the descriptor of property `name` from the accessor methods
    /// declared along the ancestor chain of `info`.
    ///
    /// The most derived declaration of each accessor kind wins.
    ///
    /// # Errors
    ///
    /// [`ReflectError::EmptyDescriptor`] if no accessor of that property exists.
    pub fn introspect(info: &'static TypeInfo, name: &str) -> Result<Self, ReflectError> {
        let mut builder = Self::builder(name);
        for ancestor in info.ancestors() {
            for method in ancestor.methods().iter().filter(|m| m.property() == name) {
                let slot = builder.slot(method.kind());
                if slot.is_none() {
                    *slot = Some(MethodHandle::new(ancestor, method));
                }
            }
        }
        builder.build()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn read_method(&self) -> Option<MethodHandle> {
        self.read
    }

    #[inline]
    pub fn write_method(&self) -> Option<MethodHandle> {
        self.write
    }

    #[inline]
    pub fn indexed_read_method(&self) -> Option<MethodHandle> {
        self.indexed_read
    }

    #[inline]
    pub fn indexed_write_method(&self) -> Option<MethodHandle> {
        self.indexed_write
    }

    /// The accessor of the given kind.
    pub fn method(&self, kind: MethodKind) -> Option<MethodHandle> {
        match kind {
            MethodKind::Read => self.read,
            MethodKind::Write => self.write,
            MethodKind::ReadIndexed => self.indexed_read,
            MethodKind::WriteIndexed => self.indexed_write,
        }
    }

    #[inline]
    pub fn property_type(&self) -> Option<&'static TypeInfo> {
        self.property_type
    }

    #[inline]
    pub fn indexed_type(&self) -> Option<&'static TypeInfo> {
        self.indexed_type
    }

    /// Returns `true` if the property has an indexed accessor.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indexed_read.is_some() || self.indexed_write.is_some()
    }
}

// -----------------------------------------------------------------------------
// PropertyDescriptorBuilder

/// Builds a [`PropertyDescriptor`] by hand.
///
/// # Examples
///
/// ```
/// use np_reflect::info::{MethodHandle, MethodInfo, NonGenericTypeInfoCell, TypeInfo, Typed};
/// use np_reflect::property::PropertyDescriptor;
/// use np_reflect::{InvokeError, Reflect};
///
/// struct Counter(u32);
///
/// fn get_count(this: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
///     let this = np_reflect::info::receiver::<Counter>(this)?;
///     Ok(Some(this.0.as_reflect()))
/// }
///
/// impl Typed for Counter {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::class::<Self>()
///                 .with_method(MethodInfo::reader("count", "count", get_count).with_value_type::<u32>())
///         })
///     }
/// }
///
/// np_reflect::impl_reflect_opaque!(Counter);
///
/// let read = MethodHandle::find(Counter::type_info(), "count").unwrap();
/// let descriptor = PropertyDescriptor::builder("count").read(read).build().unwrap();
///
/// assert!(descriptor.property_type().is_some_and(|t| t.is::<u32>()));
/// assert!(PropertyDescriptor::builder("count").build().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PropertyDescriptorBuilder {
    descriptor: PropertyDescriptor,
}

impl PropertyDescriptorBuilder {
    fn slot(&mut self, kind: MethodKind) -> &mut Option<MethodHandle> {
        let descriptor = &mut self.descriptor;
        match kind {
            MethodKind::Read => &mut descriptor.read,
            MethodKind::Write => &mut descriptor.write,
            MethodKind::ReadIndexed => &mut descriptor.indexed_read,
            MethodKind::WriteIndexed => &mut descriptor.indexed_write,
        }
    }

    #[inline]
    pub fn read(mut self, handle: MethodHandle) -> Self {
        self.descriptor.read = Some(handle);
        self
    }

    #[inline]
    pub fn write(mut self, handle: MethodHandle) -> Self {
        self.descriptor.write = Some(handle);
        self
    }

    #[inline]
    pub fn indexed_read(mut self, handle: MethodHandle) -> Self {
        self.descriptor.indexed_read = Some(handle);
        self
    }

    #[inline]
    pub fn indexed_write(mut self, handle: MethodHandle) -> Self {
        self.descriptor.indexed_write = Some(handle);
        self
    }

    /// Overrides the property type taken from the accessors.
    #[inline]
    pub fn property_type(mut self, info: &'static TypeInfo) -> Self {
        self.descriptor.property_type = Some(info);
        self
    }

    /// Overrides the element type taken from the indexed accessors.
    #[inline]
    pub fn indexed_type(mut self, info: &'static TypeInfo) -> Self {
        self.descriptor.indexed_type = Some(info);
        self
    }

    /// # Errors
    ///
    /// [`ReflectError::EmptyDescriptor`] if no accessor was given.
    pub fn build(self) -> Result<PropertyDescriptor, ReflectError> {
        let mut descriptor = self.descriptor;
        let value_type = |handle: Option<MethodHandle>| handle?.method().value_type();

        if descriptor.read.is_none()
            && descriptor.write.is_none()
            && !descriptor.is_indexed()
        {
            return Err(ReflectError::EmptyDescriptor {
                property: descriptor.name,
            });
        }
        descriptor.property_type = descriptor
            .property_type
            .or_else(|| value_type(descriptor.read))
            .or_else(|| value_type(descriptor.write));
        descriptor.indexed_type = descriptor
            .indexed_type
            .or_else(|| value_type(descriptor.indexed_read))
            .or_else(|| value_type(descriptor.indexed_write));
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::PropertyDescriptor;
    use crate::info::{MethodInfo, MethodKind, NonGenericTypeInfoCell, TypeInfo, Typed};
    use crate::{ErrorKind, InvokeError, Reflect};

    struct Base;
    struct Child;

    fn read_nothing(_: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
        Ok(None)
    }

    fn write_nothing(_: &mut dyn Reflect, _: Option<Box<dyn Reflect>>) -> Result<(), InvokeError> {
        Ok(())
    }

    impl Typed for Base {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::class::<Self>()
                    .with_method(
                        MethodInfo::reader("get_size", "size", read_nothing).with_value_type::<u32>(),
                    )
                    .with_method(
                        MethodInfo::writer("set_size", "size", write_nothing).with_value_type::<u32>(),
                    )
            })
        }
    }

    impl Typed for Child {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::class::<Self>()
                    .with_parent(Base::type_info())
                    .with_method(
                        MethodInfo::reader("get_size", "size", read_nothing).with_value_type::<u32>(),
                    )
            })
        }
    }

    #[test]
    fn most_derived_accessor_wins() {
        let descriptor = PropertyDescriptor::introspect(Child::type_info(), "size").unwrap();

        let read = descriptor.read_method().unwrap();
        let write = descriptor.method(MethodKind::Write).unwrap();
        assert!(read.declaring_type().is::<Child>());
        assert!(write.declaring_type().is::<Base>());
        assert!(descriptor.property_type().is_some_and(|t| t.is::<u32>()));
        assert!(!descriptor.is_indexed());
        assert_eq!(descriptor.name(), "size");
    }

    #[test]
    fn unknown_property_is_a_binding_error() {
        let error = PropertyDescriptor::introspect(Child::type_info(), "weight").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Binding);
    }
}
