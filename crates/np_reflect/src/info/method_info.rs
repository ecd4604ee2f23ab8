use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use bitflags::bitflags;

use crate::info::{TypeInfo, Typed};
use crate::{FromReflect, InvokeError, Reflect};

// -----------------------------------------------------------------------------
// MethodKind

/// The role an accessor method plays for its property.
///
/// The kind also fixes the parameter signature:
///
/// | kind           | parameters      |
/// |----------------|-----------------|
/// | `Read`         | `()`            |
/// | `Write`        | `(V)`           |
/// | `ReadIndexed`  | `(usize)`       |
/// | `WriteIndexed` | `(usize, V)`    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Read,
    Write,
    ReadIndexed,
    WriteIndexed,
}

impl MethodKind {
    /// Returns `true` if the signature carries a value parameter.
    #[inline]
    pub const fn takes_value(self) -> bool {
        matches!(self, Self::Write | Self::WriteIndexed)
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.pad("read"),
            Self::Write => f.pad("write"),
            Self::ReadIndexed => f.pad("indexed read"),
            Self::WriteIndexed => f.pad("indexed write"),
        }
    }
}

// -----------------------------------------------------------------------------
// MemberFlags

bitflags! {
    /// Static properties of a member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u8 {
        /// The member is declared publicly accessible.
        const PUBLIC = 1 << 0;
    }
}

// -----------------------------------------------------------------------------
// MethodBody

pub type ReadFn = for<'a> fn(&'a dyn Reflect) -> Result<Option<&'a dyn Reflect>, InvokeError>;
pub type ReadMutFn =
    for<'a> fn(&'a mut dyn Reflect) -> Result<Option<&'a mut dyn Reflect>, InvokeError>;
pub type WriteFn = fn(&mut dyn Reflect, Option<Box<dyn Reflect>>) -> Result<(), InvokeError>;
pub type ReadIndexedFn =
    for<'a> fn(&'a dyn Reflect, usize) -> Result<Option<&'a dyn Reflect>, InvokeError>;
pub type WriteIndexedFn =
    fn(&mut dyn Reflect, usize, Option<Box<dyn Reflect>>) -> Result<(), InvokeError>;

/// The callable implementation of an accessor.
#[derive(Clone, Copy)]
pub enum MethodBody {
    Read {
        get: ReadFn,
        get_mut: Option<ReadMutFn>,
    },
    Write(WriteFn),
    ReadIndexed(ReadIndexedFn),
    WriteIndexed(WriteIndexedFn),
}

impl MethodBody {
    #[inline]
    pub fn kind(&self) -> MethodKind {
        match self {
            Self::Read { .. } => MethodKind::Read,
            Self::Write(_) => MethodKind::Write,
            Self::ReadIndexed(_) => MethodKind::ReadIndexed,
            Self::WriteIndexed(_) => MethodKind::WriteIndexed,
        }
    }
}

impl fmt::Debug for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodBody({})", self.kind())
    }
}

// -----------------------------------------------------------------------------
// MethodInfo

/// A declared accessor method.
///
/// Methods without a body are declarations, as found on interfaces;
/// invoking one dispatches to the receiver's implementation.
///
/// # Examples
///
/// ```
/// use np_reflect::info::{MethodInfo, MethodKind, receiver};
/// use np_reflect::{InvokeError, Reflect};
///
/// fn text(this: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
///     Ok(Some(receiver::<String>(this)?.as_reflect()))
/// }
///
/// let method = MethodInfo::reader("get_text", "text", text).with_value_type::<String>();
/// assert_eq!(method.kind(), MethodKind::Read);
/// assert!(method.is_public());
///
/// let declared = MethodInfo::declare("get_text", "text", MethodKind::Read);
/// assert!(declared.same_signature(&method));
/// assert!(declared.body().is_none());
/// ```
#[derive(Clone)]
pub struct MethodInfo {
    name: &'static str,
    property: &'static str,
    kind: MethodKind,
    value_type: Option<fn() -> &'static TypeInfo>,
    flags: MemberFlags,
    body: Option<MethodBody>,
}

impl MethodInfo {
    const fn new(
        name: &'static str,
        property: &'static str,
        kind: MethodKind,
        body: Option<MethodBody>,
    ) -> Self {
        Self {
            name,
            property,
            kind,
            value_type: None,
            flags: MemberFlags::PUBLIC,
            body,
        }
    }

    /// Declares a method without an implementation.
    #[inline]
    pub const fn declare(name: &'static str, property: &'static str, kind: MethodKind) -> Self {
        Self::new(name, property, kind, None)
    }

    #[inline]
    pub const fn reader(name: &'static str, property: &'static str, get: ReadFn) -> Self {
        Self::new(
            name,
            property,
            MethodKind::Read,
            Some(MethodBody::Read { get, get_mut: None }),
        )
    }

    /// A reader that can also hand out mutable access to the property value.
    #[inline]
    pub const fn reader_mut(
        name: &'static str,
        property: &'static str,
        get: ReadFn,
        get_mut: ReadMutFn,
    ) -> Self {
        Self::new(
            name,
            property,
            MethodKind::Read,
            Some(MethodBody::Read {
                get,
                get_mut: Some(get_mut),
            }),
        )
    }

    #[inline]
    pub const fn writer(name: &'static str, property: &'static str, set: WriteFn) -> Self {
        Self::new(name, property, MethodKind::Write, Some(MethodBody::Write(set)))
    }

    #[inline]
    pub const fn indexed_reader(
        name: &'static str,
        property: &'static str,
        get: ReadIndexedFn,
    ) -> Self {
        Self::new(
            name,
            property,
            MethodKind::ReadIndexed,
            Some(MethodBody::ReadIndexed(get)),
        )
    }

    #[inline]
    pub const fn indexed_writer(
        name: &'static str,
        property: &'static str,
        set: WriteIndexedFn,
    ) -> Self {
        Self::new(
            name,
            property,
            MethodKind::WriteIndexed,
            Some(MethodBody::WriteIndexed(set)),
        )
    }

    /// Declares the property value type (the element type for indexed accessors).
    #[inline]
    pub fn with_value_type<T: Typed>(mut self) -> Self {
        self.value_type = Some(T::type_info);
        self
    }

    /// Marks the member as not publicly accessible.
    #[inline]
    pub fn non_public(mut self) -> Self {
        self.flags.remove(MemberFlags::PUBLIC);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The name of the property this method reads or writes.
    #[inline]
    pub fn property(&self) -> &'static str {
        self.property
    }

    #[inline]
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    #[inline]
    pub fn flags(&self) -> MemberFlags {
        self.flags
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.flags.contains(MemberFlags::PUBLIC)
    }

    #[inline]
    pub fn value_type(&self) -> Option<&'static TypeInfo> {
        self.value_type.map(|f| f())
    }

    #[inline]
    pub fn body(&self) -> Option<&MethodBody> {
        self.body.as_ref()
    }

    /// Returns `true` if both methods have the same name and parameter signature.
    pub fn same_signature(&self, other: &MethodInfo) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && (!self.kind.takes_value() || self.value_type_id() == other.value_type_id())
    }

    fn value_type_id(&self) -> TypeId {
        self.value_type
            .map_or(TypeId::of::<dyn Reflect>(), |f| f().id())
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("property", &self.property)
            .field("kind", &self.kind)
            .field("value_type", &self.value_type().map(TypeInfo::type_path))
            .field("flags", &self.flags)
            .field("abstract", &self.body.is_none())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MethodHandle

/// An invocable reference to a method bound to its declaring type.
///
/// Handles are plain pairs of static metadata and can be copied freely.
/// Invocation checks accessibility first: both the member and the
/// declaring type must be public. The call then dispatches to the most
/// derived implementation on the receiver's runtime type.
#[derive(Clone, Copy)]
pub struct MethodHandle {
    declaring: &'static TypeInfo,
    method: &'static MethodInfo,
}

impl MethodHandle {
    #[inline]
    pub const fn new(declaring: &'static TypeInfo, method: &'static MethodInfo) -> Self {
        Self { declaring, method }
    }

    /// The handle of the first method named `name` declared by `declaring`.
    pub fn find(declaring: &'static TypeInfo, name: &str) -> Option<Self> {
        declaring
            .declared_method(name)
            .map(|method| Self::new(declaring, method))
    }

    #[inline]
    pub fn declaring_type(&self) -> &'static TypeInfo {
        self.declaring
    }

    #[inline]
    pub fn method(&self) -> &'static MethodInfo {
        self.method
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.method.name
    }

    #[inline]
    pub fn kind(&self) -> MethodKind {
        self.method.kind
    }

    /// Returns `true` if the handle can be invoked from outside its declaring type.
    #[inline]
    pub fn is_callable(&self) -> bool {
        self.method.is_public() && self.declaring.is_public()
    }

    fn resolve(&self, receiver: &TypeInfo) -> Result<MethodBody, InvokeError> {
        if !self.is_callable() {
            return Err(InvokeError::IllegalAccess {
                owner: self.declaring.type_path(),
                member: self.method.name,
            });
        }
        if !receiver.is_subtype_of(self.declaring) {
            return Err(InvokeError::WrongReceiver {
                expected: self.declaring.type_path(),
                actual: receiver.type_path(),
            });
        }
        receiver
            .find_implementation(self.method)
            .and_then(MethodInfo::body)
            .or(self.method.body())
            .copied()
            .ok_or(InvokeError::Abstract {
                owner: self.declaring.type_path(),
                member: self.method.name,
            })
    }

    fn mismatch(&self, expected: MethodKind) -> InvokeError {
        InvokeError::SignatureMismatch {
            member: self.method.name,
            expected,
        }
    }

    pub fn invoke_read<'a>(
        &self,
        receiver: &'a dyn Reflect,
    ) -> Result<Option<&'a dyn Reflect>, InvokeError> {
        match self.resolve(receiver.reflect_type_info())? {
            MethodBody::Read { get, .. } => get(receiver),
            _ => Err(self.mismatch(MethodKind::Read)),
        }
    }

    pub fn invoke_read_mut<'a>(
        &self,
        receiver: &'a mut dyn Reflect,
    ) -> Result<Option<&'a mut dyn Reflect>, InvokeError> {
        match self.resolve(receiver.reflect_type_info())? {
            MethodBody::Read {
                get_mut: Some(get_mut),
                ..
            } => get_mut(receiver),
            MethodBody::Read { get_mut: None, .. } => Err(InvokeError::ReadOnly {
                member: self.method.name,
            }),
            _ => Err(self.mismatch(MethodKind::Read)),
        }
    }

    pub fn invoke_write(
        &self,
        receiver: &mut dyn Reflect,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<(), InvokeError> {
        match self.resolve(receiver.reflect_type_info())? {
            MethodBody::Write(set) => set(receiver, value),
            _ => Err(self.mismatch(MethodKind::Write)),
        }
    }

    pub fn invoke_read_indexed<'a>(
        &self,
        receiver: &'a dyn Reflect,
        index: usize,
    ) -> Result<Option<&'a dyn Reflect>, InvokeError> {
        match self.resolve(receiver.reflect_type_info())? {
            MethodBody::ReadIndexed(get) => get(receiver, index),
            _ => Err(self.mismatch(MethodKind::ReadIndexed)),
        }
    }

    pub fn invoke_write_indexed(
        &self,
        receiver: &mut dyn Reflect,
        index: usize,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<(), InvokeError> {
        match self.resolve(receiver.reflect_type_info())? {
            MethodBody::WriteIndexed(set) => set(receiver, index, value),
            _ => Err(self.mismatch(MethodKind::WriteIndexed)),
        }
    }
}

impl fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodHandle({}::{})", self.declaring.name(), self.method.name)
    }
}

impl PartialEq for MethodHandle {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.declaring, other.declaring) && core::ptr::eq(self.method, other.method)
    }
}

impl Eq for MethodHandle {}

// -----------------------------------------------------------------------------
// Accessor body helpers

/// Downcasts an accessor receiver.
#[inline]
pub fn receiver<T: Reflect + Typed>(this: &dyn Reflect) -> Result<&T, InvokeError> {
    this.downcast_ref::<T>()
        .ok_or_else(|| wrong_receiver::<T>(this.reflect_type_info()))
}

/// Downcasts an accessor receiver mutably.
#[inline]
pub fn receiver_mut<T: Reflect + Typed>(this: &mut dyn Reflect) -> Result<&mut T, InvokeError> {
    let actual = this.reflect_type_info();
    this.downcast_mut::<T>()
        .ok_or_else(|| wrong_receiver::<T>(actual))
}

fn wrong_receiver<T: Typed>(actual: &TypeInfo) -> InvokeError {
    InvokeError::WrongReceiver {
        expected: T::type_info().type_path(),
        actual: actual.type_path(),
    }
}

/// Takes an accessor argument as `T`.
///
/// Absence stays absent; a value of any other type is rejected.
pub fn argument<T: FromReflect + Typed>(
    value: Option<Box<dyn Reflect>>,
) -> Result<Option<T>, InvokeError> {
    match value {
        None => Ok(None),
        Some(value) => T::take_from_reflect(value).map(Some).map_err(|value| {
            InvokeError::WrongArgument {
                expected: T::type_info().type_path(),
                actual: value.reflect_type_info().type_path(),
            }
        }),
    }
}
