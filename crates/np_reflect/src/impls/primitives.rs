use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::convert;
use crate::info::{NonGenericTypeInfoCell, TypeFlags, TypeInfo, Typed};
use crate::{FromReflect, Reflect};

macro_rules! impl_reflect_scalar {
    ($ty:ty, $info:expr) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| $info)
            }
        }

        impl Reflect for $ty {
            crate::reflection::impl_reflect_cast_fn!(Opaque);

            #[inline]
            fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
                Some(other.downcast_ref::<Self>().is_some_and(|other| other == self))
            }

            #[inline]
            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }

        impl FromReflect for $ty {
            #[inline]
            fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
                reflect.downcast_ref::<Self>().cloned()
            }
        }
    };
}

macro_rules! impl_reflect_primitive {
    ($($ty:ty => $convert:expr),* $(,)?) => {
        $(
            impl_reflect_scalar!(
                $ty,
                TypeInfo::primitive::<$ty>().with_converter($convert)
            );
        )*
    };
}

impl_reflect_primitive! {
    bool => convert::convert_bool,
    char => convert::convert_char,
    i8 => convert::convert_int::<i8>,
    i16 => convert::convert_int::<i16>,
    i32 => convert::convert_int::<i32>,
    i64 => convert::convert_int::<i64>,
    i128 => convert::convert_int::<i128>,
    isize => convert::convert_int::<isize>,
    u8 => convert::convert_int::<u8>,
    u16 => convert::convert_int::<u16>,
    u32 => convert::convert_int::<u32>,
    u64 => convert::convert_int::<u64>,
    u128 => convert::convert_int::<u128>,
    usize => convert::convert_int::<usize>,
    f32 => convert::convert_f32,
    f64 => convert::convert_f64,
}

fn empty_string() -> Box<dyn Reflect> {
    Box::new(String::new())
}

impl_reflect_scalar!(
    String,
    TypeInfo::class::<String>()
        .with_flags(TypeFlags::FINAL)
        .with_zero(empty_string)
        .with_converter(convert::convert_string)
);

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;

    use crate::info::Typed;
    use crate::{FromReflect, Reflect};

    #[test]
    fn scalar_kinds() {
        let info = <u16 as Typed>::type_info();

        assert!(info.is_primitive() && info.is_final());
        assert!(!<String as Typed>::type_info().is_primitive());
        assert!(<String as Typed>::type_info().is_final());
        assert_eq!(info.name(), "u16");
    }

    #[test]
    fn equality_and_debug() {
        let a = 1.5_f64.into_boxed_reflect();

        assert_eq!(a.reflect_partial_eq(&1.5_f64), Some(true));
        assert_eq!(a.reflect_partial_eq(&1.5_f32), Some(false));
        assert_eq!(format!("{:?}", String::from("x").as_reflect()), "\"x\"");
        assert_eq!(char::from_reflect(&'c'), Some('c'));
    }
}
