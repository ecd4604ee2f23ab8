//! Runtime type metadata.
//!
//! - [`TypeInfo`]: identity, [`TypeKind`], [`TypeFlags`], parent class,
//!   implemented interfaces and declared accessor methods of a type.
//! - [`MethodInfo`]: a declared accessor, with its [`MethodKind`],
//!   [`MemberFlags`] and an optional [`MethodBody`].
//! - [`MethodHandle`]: a method bound to its declaring type, the unit that
//!   property descriptors carry and the visibility repair operates on.
//! - [`Typed`] / [`DynamicTyped`]: static and dynamic access to a type's info.
//! - [`NonGenericTypeInfoCell`] / [`GenericTypeInfoCell`]: static storage.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod method_info;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use method_info::{MemberFlags, MethodBody, MethodHandle, MethodInfo, MethodKind};
pub use method_info::{ReadFn, ReadIndexedFn, ReadMutFn, WriteFn, WriteIndexedFn};
pub use method_info::{argument, receiver, receiver_mut};
pub use type_info::{ConvertFn, ReflectKind, TypeFlags, TypeInfo, TypeKind, ZeroFn};
pub use typed::{DynamicTyped, Typed};
