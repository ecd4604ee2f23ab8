use log::trace;

use crate::info::{MethodHandle, MethodInfo, TypeInfo};

/// Finds a handle to the same accessor that can be invoked from outside
/// its declaring type.
///
/// A member that is not public itself is never callable. A public member
/// of a public type is returned unchanged. Otherwise the declaring type's
/// ancestors are searched, most derived first, for a public interface
/// (directly implemented, or a super-interface of one) declaring a member
/// with the same name and signature; within an ancestor, interfaces are
/// tried in declaration order, depth-first.
///
/// Invoking the returned interface handle dispatches to the receiver's own
/// implementation.
pub fn resolve_callable(handle: Option<MethodHandle>) -> Option<MethodHandle> {
    let handle = handle?;
    if !handle.method().is_public() {
        return None;
    }
    let declaring = handle.declaring_type();
    if declaring.is_public() {
        return Some(handle);
    }

    let found = declaring.ancestors().find_map(|ancestor| {
        ancestor
            .interfaces()
            .iter()
            .find_map(|&interface| find_in_interface(interface, handle.method()))
    });
    match found {
        Some(repaired) => trace!("resolved {handle:?} through {repaired:?}"),
        None => trace!("no public path to {handle:?}"),
    }
    found
}

fn find_in_interface(interface: &'static TypeInfo, method: &MethodInfo) -> Option<MethodHandle> {
    if !interface.is_public() {
        return None;
    }
    if let Some(declared) = interface.declared_signature(method) {
        return Some(MethodHandle::new(interface, declared));
    }
    interface
        .interfaces()
        .iter()
        .find_map(|&parent| find_in_interface(parent, method))
}
