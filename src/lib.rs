//! Uniform value access for path-expression evaluators.
//!
//! This facade re-exports the member crates of the workspace:
//!
//! - [`reflect`]: runtime values, collection shapes, property binding and
//!   dynamic property handlers.
//! - [`utils`]: hashing primitives and the `TypeId` keyed map.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use np_reflect as reflect;
pub use np_utils as utils;
