use alloc::boxed::Box;

use log::{trace, warn};

use super::{PropertyDescriptor, resolve_callable};
use crate::access::{self, CollectionShape};
use crate::convert::coerce;
use crate::info::{MethodHandle, MethodKind};
use crate::{Reflect, ReflectError};

/// The default number of indices [`length_of`] probes before giving up.
pub const LENGTH_PROBE_LIMIT: usize = 16_000;

fn callable(
    descriptor: &PropertyDescriptor,
    kind: MethodKind,
) -> Result<MethodHandle, ReflectError> {
    resolve_callable(descriptor.method(kind)).ok_or_else(|| ReflectError::Binding {
        property: descriptor.name().into(),
        accessor: kind,
    })
}

#[inline]
fn host_path(host: &dyn Reflect) -> &'static str {
    host.reflect_type_info().type_path()
}

// -----------------------------------------------------------------------------
// Plain access

/// Reads the property through its read accessor.
///
/// # Errors
///
/// [`ReflectError::Binding`] if there is no callable read accessor, and
/// [`ReflectError::Access`] if the accessor fails.
pub fn read<'a>(
    host: &'a dyn Reflect,
    descriptor: &PropertyDescriptor,
) -> Result<Option<&'a dyn Reflect>, ReflectError> {
    callable(descriptor, MethodKind::Read)?
        .invoke_read(host)
        .map_err(|e| ReflectError::access(host_path(host), descriptor.name(), e))
}

/// Reads the property through its read accessor, mutably.
///
/// # Errors
///
/// As [`read`]; a read accessor without mutable access fails with
/// [`ReflectError::Access`].
pub fn read_mut<'a>(
    host: &'a mut dyn Reflect,
    descriptor: &PropertyDescriptor,
) -> Result<Option<&'a mut dyn Reflect>, ReflectError> {
    let handle = callable(descriptor, MethodKind::Read)?;
    let path = host_path(host);
    handle
        .invoke_read_mut(host)
        .map_err(|e| ReflectError::access(path, descriptor.name(), e))
}

/// Writes the property through its write accessor, coercing `value` to
/// the property type first.
///
/// # Errors
///
/// [`ReflectError::Binding`] if there is no callable write accessor,
/// [`ReflectError::Conversion`] if the value cannot be coerced, and
/// [`ReflectError::Access`] if the accessor fails.
pub fn write(
    host: &mut dyn Reflect,
    descriptor: &PropertyDescriptor,
    value: Option<Box<dyn Reflect>>,
) -> Result<(), ReflectError> {
    let handle = callable(descriptor, MethodKind::Write)?;
    let value = coerce(value, descriptor.property_type())?;
    let path = host_path(host);
    handle
        .invoke_write(host, value)
        .map_err(|e| ReflectError::access(path, descriptor.name(), e))
}

// -----------------------------------------------------------------------------
// Indexed access

/// Reads element `index` of the property.
///
/// With an indexed read accessor, an out of bounds failure of the accessor
/// reads as absence. Without one, the plain property value is read and
/// indexed with [`access::get`].
///
/// # Errors
///
/// [`ReflectError::Binding`] if the accessor needed is not callable, and
/// [`ReflectError::Access`] if it fails otherwise.
pub fn read_indexed<'a>(
    host: &'a dyn Reflect,
    descriptor: &PropertyDescriptor,
    index: usize,
) -> Result<Option<&'a dyn Reflect>, ReflectError> {
    if descriptor.indexed_read_method().is_none() {
        return Ok(access::get(read(host, descriptor)?, index));
    }

    let handle = callable(descriptor, MethodKind::ReadIndexed)?;
    match handle.invoke_read_indexed(host, index) {
        Ok(value) => Ok(value),
        Err(e) if e.is_out_of_bounds() => {
            trace!("{}[{index}] is out of bounds, reading as absence", descriptor.name());
            Ok(None)
        }
        Err(e) => Err(ReflectError::access(host_path(host), descriptor.name(), e)),
    }
}

/// Writes element `index` of the property.
///
/// With an indexed write accessor, `value` is coerced to the element type
/// and handed to it. Without one, the plain property value is read: a
/// collection gets the element replaced through [`access::set`], any other
/// value is overwritten by a plain [`write`] if `index` is 0.
///
/// # Errors
///
/// [`ReflectError::NotCollection`] for a non-zero index into a
/// non-collection property, plus the errors of the operations delegated to.
/// Out of bounds failures of the indexed accessor are not swallowed.
pub fn write_indexed(
    host: &mut dyn Reflect,
    descriptor: &PropertyDescriptor,
    index: usize,
    value: Option<Box<dyn Reflect>>,
) -> Result<(), ReflectError> {
    if descriptor.indexed_write_method().is_some() {
        let handle = callable(descriptor, MethodKind::WriteIndexed)?;
        let value = coerce(value, descriptor.indexed_type())?;
        let path = host_path(host);
        return handle
            .invoke_write_indexed(host, index, value)
            .map_err(|e| ReflectError::access(path, descriptor.name(), e));
    }

    let shape = access::unwrap(read(host, descriptor)?).map(|current| {
        (CollectionShape::of(current), current.reflect_type_info())
    });
    match shape {
        Some((CollectionShape::UnorderedCollection, info)) => {
            Err(ReflectError::unsupported("set an element of", info))
        }
        Some((shape, _)) if shape.is_collection() => match read_mut(host, descriptor)? {
            Some(collection) => access::set(collection, index, value),
            None => Ok(()),
        },
        _ if index == 0 => write(host, descriptor, value),
        _ => Err(ReflectError::NotCollection {
            property: descriptor.name().into(),
        }),
    }
}

// -----------------------------------------------------------------------------
// Length

/// The number of elements of the property, probing at most
/// [`LENGTH_PROBE_LIMIT`] indices.
///
/// See [`length_of_with_limit`].
///
/// # Errors
///
/// As [`length_of_with_limit`].
#[inline]
pub fn length_of(host: &dyn Reflect, descriptor: &PropertyDescriptor) -> Result<usize, ReflectError> {
    length_of_with_limit(host, descriptor, LENGTH_PROBE_LIMIT)
}

/// The number of elements of the property.
///
/// With a read accessor this is [`access::length`] of the plain value.
/// Otherwise the indexed read accessor is invoked with 0, 1, 2, ... until it
/// fails; the first failing index is the length.
///
/// # Errors
///
/// [`ReflectError::LengthIndeterminate`] if the accessor does not fail
/// within `limit` indices, and [`ReflectError::Binding`] if neither accessor
/// is callable.
pub fn length_of_with_limit(
    host: &dyn Reflect,
    descriptor: &PropertyDescriptor,
    limit: usize,
) -> Result<usize, ReflectError> {
    if descriptor.read_method().is_some() {
        return Ok(access::length(read(host, descriptor)?));
    }

    let handle = callable(descriptor, MethodKind::ReadIndexed)?;
    if let Some(len) = (0..limit).find(|&i| handle.invoke_read_indexed(host, i).is_err()) {
        return Ok(len);
    }
    warn!(
        "`{}.{}` answered all {limit} probed indices",
        host_path(host),
        descriptor.name()
    );
    Err(ReflectError::LengthIndeterminate {
        property: descriptor.name().into(),
        limit,
    })
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{length_of, length_of_with_limit, read, read_indexed, write, write_indexed};
    use crate::info::{MethodInfo, NonGenericTypeInfoCell, TypeInfo, Typed};
    use crate::info::{argument, receiver, receiver_mut};
    use crate::lexical::{LexicalError, LexicalErrorReason};
    use crate::ops::Deferred;
    use crate::property::PropertyDescriptor;
    use crate::{ErrorKind, InvokeError, Reflect, ReflectError};

    #[derive(Default)]
    struct Bean {
        name: String,
        scores: Vec<i32>,
        tags: BTreeSet<String>,
        frozen: Vec<i32>,
        bag: Option<Deferred>,
        digits: Box<[u8]>,
    }

    fn get_name(this: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
        Ok(Some(receiver::<Bean>(this)?.name.as_reflect()))
    }

    fn set_name(this: &mut dyn Reflect, value: Option<Box<dyn Reflect>>) -> Result<(), InvokeError> {
        receiver_mut::<Bean>(this)?.name = argument::<String>(value)?.unwrap_or_default();
        Ok(())
    }

    fn get_scores(this: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
        Ok(Some(receiver::<Bean>(this)?.scores.as_reflect()))
    }

    fn get_scores_mut(this: &mut dyn Reflect) -> Result<Option<&mut dyn Reflect>, InvokeError> {
        Ok(Some(receiver_mut::<Bean>(this)?.scores.as_reflect_mut()))
    }

    fn get_tags(this: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
        Ok(Some(receiver::<Bean>(this)?.tags.as_reflect()))
    }

    fn get_frozen(this: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
        Ok(Some(receiver::<Bean>(this)?.frozen.as_reflect()))
    }

    fn get_bag(this: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
        Ok(receiver::<Bean>(this)?.bag.as_ref().map(|bag| bag.as_reflect()))
    }

    fn get_digit(this: &dyn Reflect, index: usize) -> Result<Option<&dyn Reflect>, InvokeError> {
        let digits = &receiver::<Bean>(this)?.digits;
        match digits.get(index) {
            Some(digit) => Ok(Some(digit.as_reflect())),
            None => Err(InvokeError::OutOfBounds {
                index,
                len: digits.len(),
            }),
        }
    }

    fn set_digit(
        this: &mut dyn Reflect,
        index: usize,
        value: Option<Box<dyn Reflect>>,
    ) -> Result<(), InvokeError> {
        let digits = &mut receiver_mut::<Bean>(this)?.digits;
        let len = digits.len();
        let slot = digits
            .get_mut(index)
            .ok_or(InvokeError::OutOfBounds { index, len })?;
        *slot = argument::<u8>(value)?.unwrap_or_default();
        Ok(())
    }

    fn get_probe(_: &dyn Reflect, index: usize) -> Result<Option<&dyn Reflect>, InvokeError> {
        if index < 7 {
            Ok(Some(&0_u8))
        } else {
            Err(InvokeError::failed("no such element"))
        }
    }

    fn get_endless(_: &dyn Reflect, _: usize) -> Result<Option<&dyn Reflect>, InvokeError> {
        Ok(None)
    }

    fn get_broken(_: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
        Err(InvokeError::failed("disk on fire"))
    }

    fn get_source(_: &dyn Reflect) -> Result<Option<&dyn Reflect>, InvokeError> {
        Err(LexicalError::new(false, 0, 1, 4, "a/", '#', LexicalErrorReason::LexicalError).into())
    }

    impl Typed for Bean {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                TypeInfo::class::<Self>()
                    .with_method(MethodInfo::reader("get_name", "name", get_name).with_value_type::<String>())
                    .with_method(MethodInfo::writer("set_name", "name", set_name).with_value_type::<String>())
                    .with_method(
                        MethodInfo::reader_mut("get_scores", "scores", get_scores, get_scores_mut)
                            .with_value_type::<Vec<i32>>(),
                    )
                    .with_method(MethodInfo::reader("get_tags", "tags", get_tags))
                    .with_method(MethodInfo::reader("get_frozen", "frozen", get_frozen))
                    .with_method(MethodInfo::reader("get_bag", "bag", get_bag))
                    .with_method(
                        MethodInfo::indexed_reader("get_digit", "digits", get_digit).with_value_type::<u8>(),
                    )
                    .with_method(
                        MethodInfo::indexed_writer("set_digit", "digits", set_digit).with_value_type::<u8>(),
                    )
                    .with_method(MethodInfo::indexed_reader("get_probe", "probe", get_probe))
                    .with_method(MethodInfo::indexed_reader("get_endless", "endless", get_endless))
                    .with_method(MethodInfo::reader("get_broken", "broken", get_broken))
                    .with_method(MethodInfo::reader("get_source", "source", get_source))
            })
        }
    }

    crate::impl_reflect_opaque!(Bean);

    fn property(name: &str) -> PropertyDescriptor {
        PropertyDescriptor::introspect(Bean::type_info(), name).unwrap()
    }

    fn bean() -> Bean {
        Bean {
            name: String::from("np"),
            scores: vec![3, 5],
            tags: ["x", "y"].into_iter().map(String::from).collect(),
            frozen: vec![1, 1],
            bag: Some(Deferred::new(Some(Box::new(BTreeSet::from([7_u8]))))),
            digits: vec![1, 2, 3].into_boxed_slice(),
        }
    }

    #[test]
    fn write_then_read_round_trips_after_coercion() {
        let mut bean = bean();
        let name = property("name");

        write(&mut bean, &name, Some(Box::new(42_u32))).unwrap();
        let value = read(&bean, &name).unwrap();
        assert_eq!(value.and_then(|v| v.downcast_ref::<String>()).unwrap(), "42");

        write(&mut bean, &name, None).unwrap();
        assert_eq!(bean.name, "");
    }

    #[test]
    fn missing_accessors_are_binding_errors() {
        let mut bean = bean();

        let error = write(&mut bean, &property("scores"), None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Binding);
        let error = read(&bean, &property("probe")).unwrap_err();
        assert!(matches!(error, ReflectError::Binding { .. }));
    }

    #[test]
    fn failures_are_access_errors_except_lexical() {
        let bean = bean();

        let error = read(&bean, &property("broken")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Access);
        assert!(matches!(&error, ReflectError::Access { property, .. } if property == "broken"));

        match read(&bean, &property("source")).unwrap_err() {
            ReflectError::Lexical(lexical) => assert_eq!((lexical.line(), lexical.column()), (1, 4)),
            error => panic!("expected a lexical error, got {error:?}"),
        }
    }

    #[test]
    fn indexed_reads_are_lenient() {
        let bean = bean();
        let digits = property("digits");

        let value = read_indexed(&bean, &digits, 1).unwrap();
        assert_eq!(value.and_then(|v| v.downcast_ref::<u8>()), Some(&2));
        assert!(read_indexed(&bean, &digits, 3).unwrap().is_none());

        let scores = property("scores");
        let value = read_indexed(&bean, &scores, 1).unwrap();
        assert_eq!(value.and_then(|v| v.downcast_ref::<i32>()), Some(&5));
        assert!(read_indexed(&bean, &scores, 2).unwrap().is_none());

        let name = property("name");
        let value = read_indexed(&bean, &name, 0).unwrap();
        assert!(value.is_some_and(|v| v.is::<String>()));
    }

    #[test]
    fn indexed_writes_are_strict() {
        let mut bean = bean();
        let digits = property("digits");

        write_indexed(&mut bean, &digits, 0, Some(Box::new(9_i64))).unwrap();
        assert_eq!(&*bean.digits, &[9, 2, 3]);

        let error = write_indexed(&mut bean, &digits, 3, None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Access);
        let error = write_indexed(&mut bean, &digits, 0, Some(Box::new(-1_i32))).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn indexed_writes_fall_back_to_the_plain_value() {
        let mut bean = bean();

        write_indexed(&mut bean, &property("scores"), 1, Some(Box::new(8_u8))).unwrap();
        assert_eq!(bean.scores, [3, 8]);
        let error = write_indexed(&mut bean, &property("scores"), 2, None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Index);

        write_indexed(&mut bean, &property("name"), 0, Some(Box::new('z'))).unwrap();
        assert_eq!(bean.name, "z");
        let error = write_indexed(&mut bean, &property("name"), 1, None).unwrap_err();
        assert!(matches!(error, ReflectError::NotCollection { .. }));

        // `frozen` can be read but not borrowed mutably.
        let error = write_indexed(&mut bean, &property("frozen"), 0, None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Access);
    }

    #[test]
    fn indexed_writes_into_unordered_properties_are_unsupported() {
        let mut bean = bean();

        let error = write_indexed(&mut bean, &property("tags"), 0, None).unwrap_err();
        assert!(matches!(error, ReflectError::Unsupported { .. }));
        assert_eq!(error.kind(), ErrorKind::Unsupported);

        let error = write_indexed(&mut bean, &property("bag"), 0, Some(Box::new(1_u8))).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unsupported);
        assert_eq!(bean.tags.len(), 2);
    }

    #[test]
    fn length_from_value_or_probe() {
        let bean = bean();

        assert_eq!(length_of(&bean, &property("scores")).unwrap(), 2);
        assert_eq!(length_of(&bean, &property("name")).unwrap(), 1);
        assert_eq!(length_of(&bean, &property("probe")).unwrap(), 7);
        assert_eq!(length_of(&Bean::default(), &property("digits")).unwrap(), 0);

        let error = length_of_with_limit(&bean, &property("endless"), 32).unwrap_err();
        assert!(matches!(error, ReflectError::LengthIndeterminate { limit: 32, .. }));
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }
}
