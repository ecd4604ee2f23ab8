use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to runtime type metadata.
///
/// The metadata is built once and lives for the rest of the process;
/// use [`NonGenericTypeInfoCell`] or [`GenericTypeInfoCell`] to store it.
///
/// # Examples
///
/// ```
/// use np_reflect::info::{NonGenericTypeInfoCell, TypeFlags, TypeInfo, Typed};
///
/// struct Node;
///
/// impl Typed for Node {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::class::<Self>().with_flags(TypeFlags::FINAL))
///     }
/// }
///
/// assert!(Node::type_info().is_final());
/// assert_eq!(Node::type_info().name(), "Node");
/// ```
///
/// Interfaces are modeled by trait object types:
///
/// ```
/// use np_reflect::info::{NonGenericTypeInfoCell, TypeInfo, Typed};
///
/// trait Named {}
///
/// impl Typed for dyn Named {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(TypeInfo::interface::<Self>)
///     }
/// }
///
/// assert!(<dyn Named as Typed>::type_info().is_interface());
/// ```
///
/// [`NonGenericTypeInfoCell`]: crate::info::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::info::GenericTypeInfoCell
pub trait Typed: 'static {
    /// Returns the compiled type information.
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// DynamicTyped

/// Dynamic dispatch for [`Typed`].
///
/// Implemented for every sized [`Typed`] type, so it never needs
/// a manual implementation.
pub trait DynamicTyped {
    /// See [`Typed::type_info`].
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}
