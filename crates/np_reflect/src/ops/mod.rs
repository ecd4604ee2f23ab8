//! Shape traits and dynamic containers.
//!
//! Each subtrait of [`Reflect`] carries only the capabilities its
//! representation actually supports:
//!
//! - [`Array`]: fixed length, positional read and write, reallocation.
//! - [`List`]: growable ordered sequence, positional read and write.
//! - [`Set`]: unordered collection, sequential traversal only.
//! - [`Container`]: a single-valued holder, such as the lazy [`Deferred`].
//!
//! [`DynamicArray`] and [`DynamicList`] hold arbitrary values, including
//! absent ones; typed collections (`Box<[T]>`, `Vec<T>`, ...) store the
//! element type's zero value instead of absence.
//!
//! [`Reflect`]: crate::Reflect

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod container_ops;
mod kind;
mod list_ops;
mod set_ops;

// -----------------------------------------------------------------------------
// Exports

pub use kind::{ReflectMut, ReflectRef};

pub use array_ops::{Array, ArrayItemIter, DynamicArray};
pub use container_ops::{Container, Deferred};
pub use list_ops::{DynamicList, List, ListItemIter};
pub use set_ops::Set;
