//! Classification of values and types, and the indexed access engine.
//!
//! Every operation here unwraps [`Container`](crate::ops::Container)s first
//! (except [`iterate`] and [`expand`], which take the value as given) and
//! then dispatches on the value's shape:
//!
//! | shape              | `length` | `get`           | `set`        | `remove`         | `expand`       |
//! |--------------------|----------|-----------------|--------------|------------------|----------------|
//! | array              | len      | bounds-checked  | coerced      | reallocates      | reallocates    |
//! | ordered sequence   | len      | bounds-checked  | strict       | no-op past end   | pads           |
//! | unordered          | len      | cursor walk     | unsupported  | cursor walk      | unsupported    |
//! | scalar             | 1        | the value       | unsupported  | unsupported      | unsupported    |
//!
//! Reads are lenient: an index past the end reads as absence. Writes are
//! strict: an index past the end of a sequence is an error.

// -----------------------------------------------------------------------------
// Modules

mod classify;
mod engine;

// -----------------------------------------------------------------------------
// Exports

pub use classify::{CollectionShape, TypeHint, classify_type, is_collection, unwrap, unwrap_mut};
pub use engine::{ValueIter, expand, get, iterate, length, remove, set};
