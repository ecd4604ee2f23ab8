//! Reading and writing properties of objects through their accessors.
//!
//! A [`PropertyDescriptor`] bundles the accessors of one named property,
//! as found by [`PropertyDescriptor::introspect`] on the object's type.
//! [`resolve_callable`] turns an accessor into one that may be invoked from
//! outside its declaring type, and the functions of this module bind a host
//! object and a descriptor into reads and writes.

// -----------------------------------------------------------------------------
// Modules

mod binding;
mod descriptor;
mod visibility;

// -----------------------------------------------------------------------------
// Exports

pub use binding::{LENGTH_PROBE_LIMIT, length_of, length_of_with_limit};
pub use binding::{read, read_indexed, read_mut, write, write_indexed};
pub use descriptor::{PropertyDescriptor, PropertyDescriptorBuilder};
pub use visibility::resolve_callable;
