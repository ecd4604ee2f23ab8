use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use bitflags::bitflags;

use crate::Reflect;
use crate::info::MethodInfo;
use crate::registry::{DynamicPropertyHandler, HandlerBinding};

// -----------------------------------------------------------------------------
// ReflectKind

/// The runtime shape of a reflected value.
///
/// Obtained via [`Reflect::reflect_kind`], or from a
/// [`ReflectRef`](crate::ops::ReflectRef) / [`ReflectMut`](crate::ops::ReflectMut).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// Fixed length, index addressable.
    Array,
    /// Growable, index addressable.
    List,
    /// Sequential traversal only.
    Set,
    /// A single-valued holder that must be unwrapped.
    Container,
    /// Anything else: a scalar, or an object reached through properties.
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array => f.pad("Array"),
            Self::List => f.pad("List"),
            Self::Set => f.pad("Set"),
            Self::Container => f.pad("Container"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeFlags

bitflags! {
    /// Static properties of a type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u8 {
        /// The type can be referenced from outside its defining scope.
        const PUBLIC     = 1 << 0;
        /// The type cannot have subtypes.
        const FINAL      = 1 << 1;
        /// The type, and everything implementing it, is a collection.
        const COLLECTION = 1 << 2;
    }
}

// -----------------------------------------------------------------------------
// TypeKind

/// The structural category of a type.
#[derive(Debug, Clone, Copy)]
pub enum TypeKind {
    Primitive,
    /// A fixed-length array; `item` is absent for untyped arrays.
    Array {
        item: Option<&'static TypeInfo>,
    },
    Class,
    Interface,
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Produces the zero value of a type.
pub type ZeroFn = fn() -> Box<dyn Reflect>;

/// Converts a foreign value into the described type, if possible.
pub type ConvertFn = fn(&dyn Reflect) -> Option<Box<dyn Reflect>>;

/// Runtime metadata of a type.
///
/// Besides identity, a `TypeInfo` records what the introspection boundary
/// knows about the type: its visibility and finality, its parent class and
/// directly implemented interfaces (in declaration order), the accessor
/// methods it declares, and how to produce or convert values of it.
///
/// Built once through the `with_*` builder methods and then stored in a
/// [`NonGenericTypeInfoCell`](crate::info::NonGenericTypeInfoCell) or
/// [`GenericTypeInfoCell`](crate::info::GenericTypeInfoCell).
pub struct TypeInfo {
    id: TypeId,
    path: &'static str,
    name: String,
    kind: TypeKind,
    flags: TypeFlags,
    parent: Option<&'static TypeInfo>,
    interfaces: Vec<&'static TypeInfo>,
    methods: Vec<MethodInfo>,
    zero: Option<ZeroFn>,
    converter: Option<ConvertFn>,
    handler: Option<HandlerBinding>,
}

fn zero_of<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

impl TypeInfo {
    fn new<T: ?Sized + 'static>(kind: TypeKind, flags: TypeFlags) -> Self {
        let path = core::any::type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            path,
            name: short_name(path),
            kind,
            flags,
            parent: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            zero: None,
            converter: None,
            handler: None,
        }
    }

    /// A public, final primitive whose zero value is `T::default()`.
    pub fn primitive<T: Reflect + Default>() -> Self {
        Self::new::<T>(TypeKind::Primitive, TypeFlags::PUBLIC | TypeFlags::FINAL)
            .with_zero(zero_of::<T>)
    }

    /// A public class.
    pub fn class<T: ?Sized + 'static>() -> Self {
        Self::new::<T>(TypeKind::Class, TypeFlags::PUBLIC)
    }

    /// A public interface.
    pub fn interface<T: ?Sized + 'static>() -> Self {
        Self::new::<T>(TypeKind::Interface, TypeFlags::PUBLIC)
    }

    /// A public, final array type.
    pub fn array<T: ?Sized + 'static>(item: Option<&'static TypeInfo>) -> Self {
        Self::new::<T>(TypeKind::Array { item }, TypeFlags::PUBLIC | TypeFlags::FINAL)
    }

    /// Adds `flags` to the type.
    #[inline]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Marks the type as not publicly reachable.
    #[inline]
    pub fn non_public(mut self) -> Self {
        self.flags.remove(TypeFlags::PUBLIC);
        self
    }

    #[inline]
    pub fn with_parent(mut self, parent: &'static TypeInfo) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Appends a directly implemented interface (or a super-interface,
    /// when `self` is an interface).
    #[inline]
    pub fn with_interface(mut self, interface: &'static TypeInfo) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[inline]
    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    #[inline]
    pub fn with_zero(mut self, zero: ZeroFn) -> Self {
        self.zero = Some(zero);
        self
    }

    #[inline]
    pub fn with_converter(mut self, converter: ConvertFn) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Binds the dynamic property handler used for values of this type.
    #[inline]
    pub fn with_dynamic_handler<H: DynamicPropertyHandler>(mut self) -> Self {
        self.handler = Some(HandlerBinding::of::<H>());
        self
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns `true` if this describes `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The full type path, e.g. `alloc::vec::Vec<i32>`.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.path
    }

    /// The type path without module prefixes, e.g. `Vec<i32>`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.flags.contains(TypeFlags::PUBLIC)
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags.contains(TypeFlags::FINAL)
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive)
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    /// The element type of an array type.
    #[inline]
    pub fn item_info(&self) -> Option<&'static TypeInfo> {
        match self.kind {
            TypeKind::Array { item } => item,
            _ => None,
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<&'static TypeInfo> {
        self.parent
    }

    /// Directly implemented interfaces, in declaration order.
    #[inline]
    pub fn interfaces(&self) -> &[&'static TypeInfo] {
        &self.interfaces
    }

    /// Methods declared by this type itself.
    #[inline]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// Iterates over `self`, its parent, the parent's parent, up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &TypeInfo> {
        core::iter::successors(Some(self), |info| info.parent)
    }

    /// The first method declared by this type with the given name.
    pub fn declared_method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// The method declared by this type with the same name and
    /// parameter signature as `method`.
    pub fn declared_signature(&self, method: &MethodInfo) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.same_signature(method))
    }

    /// The most-derived implementation of `method` along the ancestor chain.
    pub fn find_implementation(&self, method: &MethodInfo) -> Option<&MethodInfo> {
        self.ancestors()
            .filter_map(|info| info.declared_signature(method))
            .find(|m| m.body().is_some())
    }

    /// Returns `true` if `self` is `other`, extends it, or implements it.
    pub fn is_subtype_of(&self, other: &TypeInfo) -> bool {
        self.any_supertype(&mut |info| info.id == other.id)
    }

    /// Returns `true` if the collection capability appears anywhere
    /// in the ancestor and interface closure.
    pub fn is_collection(&self) -> bool {
        self.any_supertype(&mut |info| info.flags.contains(TypeFlags::COLLECTION))
    }

    fn any_supertype(&self, predicate: &mut dyn FnMut(&TypeInfo) -> bool) -> bool {
        fn any_interface(info: &TypeInfo, predicate: &mut dyn FnMut(&TypeInfo) -> bool) -> bool {
            predicate(info) || info.interfaces.iter().any(|i| any_interface(i, predicate))
        }

        self.ancestors().any(|info| {
            predicate(info) || info.interfaces.iter().any(|i| any_interface(i, predicate))
        })
    }

    /// Creates the zero value of this type, if it has one.
    #[inline]
    pub fn zero_value(&self) -> Option<Box<dyn Reflect>> {
        self.zero.map(|zero| zero())
    }

    /// Converts `value` into this type with the registered converter.
    #[inline]
    pub fn convert(&self, value: &dyn Reflect) -> Option<Box<dyn Reflect>> {
        self.converter.and_then(|convert| convert(value))
    }

    /// The dynamic property handler bound to this type or its nearest ancestor.
    pub fn dynamic_handler(&self) -> Option<HandlerBinding> {
        self.ancestors().find_map(|info| info.handler)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .field("parent", &self.parent.map(TypeInfo::type_path))
            .field(
                "interfaces",
                &self.interfaces.iter().map(|i| i.path).collect::<Vec<_>>(),
            )
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

/// Strips module prefixes from every path segment of a type name.
fn short_name(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut segment = 0;
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.truncate(segment);
            }
            '<' | '>' | '[' | ']' | '(' | ')' | ',' | ';' | '&' | ' ' => {
                out.push(c);
                segment = out.len();
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{TypeFlags, TypeInfo, short_name};
    use crate::info::{NonGenericTypeInfoCell, Typed};

    #[test]
    fn short_names() {
        assert_eq!(short_name("i32"), "i32");
        assert_eq!(short_name("alloc::vec::Vec<i32>"), "Vec<i32>");
        assert_eq!(
            short_name("alloc::boxed::Box<[alloc::string::String]>"),
            "Box<[String]>"
        );
        assert_eq!(
            short_name("a::Pair<b::X, (c::Y, d::Z)>"),
            "Pair<X, (Y, Z)>"
        );
        assert_eq!(short_name("dyn my::Trait"), "dyn Trait");
    }

    trait Countable {}
    trait Sequence {}
    struct Base;
    struct Derived;

    impl Typed for dyn Countable {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(TypeInfo::interface::<Self>)
        }
    }

    impl Typed for dyn Sequence {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::interface::<Self>()
                    .with_flags(TypeFlags::COLLECTION)
                    .with_interface(<dyn Countable as Typed>::type_info())
            })
        }
    }

    impl Typed for Base {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::class::<Self>().with_interface(<dyn Sequence as Typed>::type_info())
            })
        }
    }

    impl Typed for Derived {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::class::<Self>()
                    .non_public()
                    .with_parent(Base::type_info())
            })
        }
    }

    #[test]
    fn ancestors_and_closure() {
        let derived = Derived::type_info();
        let chain: Vec<_> = derived.ancestors().map(TypeInfo::name).collect();

        assert_eq!(chain, ["Derived", "Base"]);
        assert!(!derived.is_public());
        assert!(derived.is_collection());
        assert!(derived.is_subtype_of(<dyn Countable as Typed>::type_info()));
        assert!(derived.is_subtype_of(Base::type_info()));
        assert!(!Base::type_info().is_subtype_of(derived));
        assert!(!<dyn Countable as Typed>::type_info().is_collection());
    }

    #[test]
    fn primitive_defaults() {
        let info = <i64 as Typed>::type_info();

        assert!(info.is_primitive());
        assert!(info.is_public() && info.is_final());
        let zero = info.zero_value().unwrap();
        assert_eq!(zero.downcast_ref::<i64>(), Some(&0));
    }
}
