//! Per-type dynamic property handlers and the cache that owns them.
//!
//! Types without introspectable accessors (maps, schema-less records)
//! expose their properties through a [`DynamicPropertyHandler`], bound to
//! the type with [`TypeInfo::with_dynamic_handler`](crate::info::TypeInfo::with_dynamic_handler).
//! A [`HandlerRegistry`] creates each handler type at most once and hands
//! out the shared instance afterwards.

// -----------------------------------------------------------------------------
// Modules

mod handler;
mod handler_registry;
mod map_handler;

// -----------------------------------------------------------------------------
// Exports

pub use handler::{DynamicPropertyHandler, HandlerBinding};
pub use handler_registry::HandlerRegistry;
pub use map_handler::{MapPropertyHandler, PropertyMap};
