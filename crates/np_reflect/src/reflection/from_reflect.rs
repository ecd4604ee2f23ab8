use alloc::boxed::Box;

use crate::Reflect;

/// Constructs a concrete type from a reflected value.
///
/// Typed collections use this to accept boxed writes.
///
/// # Examples
///
/// ```
/// use np_reflect::{FromReflect, Reflect};
///
/// let boxed = 7_u8.into_boxed_reflect();
/// assert_eq!(u8::take_from_reflect(boxed).ok(), Some(7));
///
/// let wrong = 'x'.into_boxed_reflect();
/// assert!(u8::take_from_reflect(wrong).is_err());
/// ```
pub trait FromReflect: Reflect + Sized {
    /// Constructs `Self` from a reflected value, if the value represents it.
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self>;

    /// Consumes a boxed value, moving it out when it already is a `Self`.
    ///
    /// On failure the original box is handed back.
    fn take_from_reflect(reflect: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>> {
        match reflect.downcast::<Self>() {
            Ok(value) => Ok(*value),
            Err(reflect) => Self::from_reflect(&*reflect).ok_or(reflect),
        }
    }
}
