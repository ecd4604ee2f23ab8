//! Coercion of written values to a declared type.
//!
//! [`coerce`] is what the access engine and the property resolver run on
//! every value written into a typed slot. The `convert_*` functions are the
//! converters registered on the scalar [`TypeInfo`]s: they translate between
//! booleans, characters, integers (range checked), floats and strings.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use crate::info::TypeInfo;
use crate::{ConversionError, Reflect};

// -----------------------------------------------------------------------------
// Coercion

/// Coerces `value` to `target`.
///
/// - without a target, the value passes unchanged;
/// - absence becomes the target's zero value if the target is primitive,
///   and stays absent otherwise;
/// - a value already of (a subtype of) the target passes unchanged;
/// - anything else goes through the target's converter.
///
/// # Examples
///
/// ```
/// use np_reflect::convert::coerce;
/// use np_reflect::info::Typed;
///
/// let value = coerce(Some(Box::new(String::from("42"))), Some(u16::type_info())).unwrap();
/// assert_eq!(value.unwrap().downcast_ref::<u16>(), Some(&42));
///
/// let zero = coerce(None, Some(f64::type_info())).unwrap();
/// assert_eq!(zero.unwrap().downcast_ref::<f64>(), Some(&0.0));
///
/// assert!(coerce(Some(Box::new(-1_i32)), Some(u8::type_info())).is_err());
/// ```
///
/// # Errors
///
/// [`ConversionError`] if the target has no converter, or the converter
/// rejects the value.
pub fn coerce(
    value: Option<Box<dyn Reflect>>,
    target: Option<&'static TypeInfo>,
) -> Result<Option<Box<dyn Reflect>>, ConversionError> {
    let Some(target) = target else {
        return Ok(value);
    };
    let Some(value) = value else {
        return Ok(zero_or_absent(Some(target)));
    };

    let source = value.reflect_type_info();
    if source.is_subtype_of(target) {
        return Ok(Some(value));
    }
    target
        .convert(&*value)
        .map(Some)
        .ok_or_else(|| ConversionError::new(source, target))
}

/// The zero value of a primitive type, absence for any other type.
#[inline]
pub fn zero_or_absent(info: Option<&TypeInfo>) -> Option<Box<dyn Reflect>> {
    info.filter(|info| info.is_primitive())
        .and_then(TypeInfo::zero_value)
}

// -----------------------------------------------------------------------------
// Scalar

/// A scalar value viewed independently of its exact Rust type.
#[derive(Debug, Clone, Copy)]
enum Scalar<'a> {
    Bool(bool),
    Char(char),
    Int(i128),
    Single(f32),
    Double(f64),
    Str(&'a str),
}

macro_rules! scalar_int {
    ($value:ident, $($ty:ty),*) => {
        $(
            if let Some(v) = $value.downcast_ref::<$ty>() {
                return i128::try_from(*v).ok().map(Scalar::Int);
            }
        )*
    };
}

impl<'a> Scalar<'a> {
    fn of(value: &'a dyn Reflect) -> Option<Self> {
        if let Some(v) = value.downcast_ref::<bool>() {
            return Some(Self::Bool(*v));
        }
        if let Some(v) = value.downcast_ref::<char>() {
            return Some(Self::Char(*v));
        }
        if let Some(v) = value.downcast_ref::<f32>() {
            return Some(Self::Single(*v));
        }
        if let Some(v) = value.downcast_ref::<f64>() {
            return Some(Self::Double(*v));
        }
        if let Some(v) = value.downcast_ref::<String>() {
            return Some(Self::Str(v));
        }
        scalar_int!(value, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
        None
    }

    fn to_int(self) -> Option<i128> {
        match self {
            Self::Bool(v) => Some(i128::from(v)),
            Self::Char(v) => Some(i128::from(u32::from(v))),
            Self::Int(v) => Some(v),
            Self::Single(v) => float_to_int(f64::from(v)),
            Self::Double(v) => float_to_int(v),
            Self::Str(v) => v.trim().parse().ok(),
        }
    }

    fn to_float(self) -> Option<f64> {
        match self {
            Self::Bool(v) => Some(if v { 1.0 } else { 0.0 }),
            Self::Char(_) => None,
            Self::Int(v) => Some(v as f64),
            Self::Single(v) => Some(f64::from(v)),
            Self::Double(v) => Some(v),
            Self::Str(v) => v.trim().parse().ok(),
        }
    }

    fn to_bool(self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(v),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            Self::Str(v) if v.trim().eq_ignore_ascii_case("true") => Some(true),
            Self::Str(v) if v.trim().eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    fn to_char(self) -> Option<char> {
        match self {
            Self::Char(v) => Some(v),
            Self::Int(v) => u32::try_from(v).ok().and_then(char::from_u32),
            Self::Str(v) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Single(v) => fmt::Display::fmt(v, f),
            Self::Double(v) => fmt::Display::fmt(v, f),
            Self::Str(v) => f.write_str(v),
        }
    }
}

fn float_to_int(v: f64) -> Option<i128> {
    // Outside this range `as` saturates.
    const LIMIT: f64 = 1.7e38;
    if !v.is_finite() || v.abs() > LIMIT {
        return None;
    }
    let i = v as i128;
    (i as f64 == v).then_some(i)
}

// -----------------------------------------------------------------------------
// Converters

/// Converts to an integer type, failing when out of range or not integral.
pub fn convert_int<T>(value: &dyn Reflect) -> Option<Box<dyn Reflect>>
where
    T: Reflect + TryFrom<i128>,
{
    let v = Scalar::of(value)?.to_int()?;
    T::try_from(v).ok().map(|v| Box::new(v) as Box<dyn Reflect>)
}

pub fn convert_f32(value: &dyn Reflect) -> Option<Box<dyn Reflect>> {
    let v = Scalar::of(value)?.to_float()?;
    Some(Box::new(v as f32))
}

pub fn convert_f64(value: &dyn Reflect) -> Option<Box<dyn Reflect>> {
    let v = Scalar::of(value)?.to_float()?;
    Some(Box::new(v))
}

pub fn convert_bool(value: &dyn Reflect) -> Option<Box<dyn Reflect>> {
    let v = Scalar::of(value)?.to_bool()?;
    Some(Box::new(v))
}

pub fn convert_char(value: &dyn Reflect) -> Option<Box<dyn Reflect>> {
    let v = Scalar::of(value)?.to_char()?;
    Some(Box::new(v))
}

/// Displays any scalar.
pub fn convert_string(value: &dyn Reflect) -> Option<Box<dyn Reflect>> {
    let v = Scalar::of(value)?;
    Some(Box::new(v.to_string()))
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::{coerce, zero_or_absent};
    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::DynamicList;

    fn to<T: Typed>(value: impl Reflect) -> Option<Box<dyn Reflect>> {
        coerce(Some(Box::new(value)), Some(T::type_info())).ok().flatten()
    }

    #[test]
    fn integers_are_range_checked() {
        assert!(to::<u8>(255_i64).is_some_and(|v| v.is::<u8>()));
        assert!(to::<u8>(256_i64).is_none());
        assert!(to::<i32>(2.0_f64).is_some_and(|v| v.is::<i32>()));
        assert!(to::<i32>(2.5_f64).is_none());
        assert!(to::<i32>(f64::NAN).is_none());
        assert!(to::<u128>(u128::MAX).is_some());
    }

    #[test]
    fn strings_parse_and_display() {
        let parsed = to::<f32>(String::from(" 1.5 ")).unwrap();
        assert_eq!(parsed.downcast_ref::<f32>(), Some(&1.5));

        let shown = to::<String>(0.1_f32).unwrap();
        assert_eq!(shown.downcast_ref::<String>().map(String::as_str), Some("0.1"));

        let flag = to::<bool>(String::from("TRUE")).unwrap();
        assert_eq!(flag.downcast_ref::<bool>(), Some(&true));
        assert!(to::<char>(String::from("ab")).is_none());
        assert_eq!(to::<char>(65_u8).unwrap().downcast_ref::<char>(), Some(&'A'));
    }

    #[test]
    fn absence_and_untyped_targets() {
        assert!(zero_or_absent(Some(String::type_info())).is_none());
        assert!(zero_or_absent(None).is_none());
        assert!(coerce(None, Some(String::type_info())).unwrap().is_none());

        let value = coerce(Some(Box::new('x')), None).unwrap().unwrap();
        assert!(value.is::<char>());
    }

    #[test]
    fn objects_need_a_converter() {
        let error = coerce(Some(Box::new(DynamicList::new())), Some(i32::type_info())).unwrap_err();

        assert_eq!(error.to_type(), "i32");
        assert!(to::<i32>(DynamicList::new()).is_none());
    }
}
