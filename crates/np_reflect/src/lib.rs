//! Uniform, index-addressable access to heterogeneous runtime values.
//!
//! A path-expression evaluator navigates values that may be arrays, ordered
//! sequences, unordered collections, single scalars, lazy containers, or
//! objects whose properties are only discovered at runtime. This crate
//! normalizes all of them behind one contract:
//!
//! - [`access`]: unwrapping containers, classifying values and types, and the
//!   indexed access engine (`length`, `get`, `set`, `remove`, `expand`,
//!   `iterate`).
//! - [`property`]: reading and writing introspected properties through
//!   [`PropertyDescriptor`](property::PropertyDescriptor)s, including the
//!   visibility repair that finds a publicly callable accessor.
//! - [`registry`]: the shared cache of per-type dynamic property handlers.
//!
//! Values are [`Reflect`] trait objects, absence is `None`.
//!
//! # Examples
//!
//! ```
//! use np_reflect::{Reflect, access};
//!
//! let scores = vec![10_i32, 20, 30].into_boxed_slice();
//!
//! assert_eq!(access::length(Some(scores.as_reflect())), 3);
//! assert!(access::get(Some(scores.as_reflect()), 5).is_none());
//!
//! let second = access::get(Some(scores.as_reflect()), 1).unwrap();
//! assert_eq!(second.downcast_ref::<i32>(), Some(&20));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reflection;

pub mod access;
pub mod convert;
pub mod impls;
pub mod info;
pub mod lexical;
pub mod ops;
pub mod property;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{ConversionError, ErrorKind, InvokeError, ReflectError};
pub use reflection::{FromReflect, Reflect};
