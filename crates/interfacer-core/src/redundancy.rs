use interfacer_syntax::TypeDecl;
use interfacer_types::{InterfaceDescriptor, TypeOracle, TypeRef};

use crate::resolve::{DeclContext, FileScope};

/// True when some existing ancestor of `class` already is (a subtype of) `iface`.
pub fn is_redundant<O: TypeOracle + ?Sized>(oracle: &O, class: &str, iface: &InterfaceDescriptor) -> bool {
    match oracle.ancestors_of(class) {
        Ok(ancestors) => is_covered_by(oracle, iface, &ancestors),
        Err(err) => {
            tracing::debug!(target: "interfacer.redundancy", class, %err, "ancestors unavailable");
            false
        }
    }
}

/// True when one of `types` is assignable to the raw `iface`.
pub fn is_covered_by<O: TypeOracle + ?Sized>(oracle: &O, iface: &InterfaceDescriptor, types: &[TypeRef]) -> bool {
    let raw = iface.raw_type();
    types.iter().any(|ty| match oracle.is_assignable(&raw, ty) {
        Ok(ok) => ok,
        Err(err) => {
            tracing::debug!(target: "interfacer.redundancy", %ty, %err, "treating type as unrelated");
            false
        }
    })
}

/// True when `decl`'s implemented-type clause already names `iface`, whether or not the
/// written name resolves.
pub fn names_interface(decl: &TypeDecl, scope: &FileScope<'_>, ctx: &DeclContext, iface: &InterfaceDescriptor) -> bool {
    decl.interfaces.iter().filter_map(|ty| ty.name()).any(|written| {
        written == iface.name
            || scope.resolve_name(written, ctx).as_deref() == Some(iface.name.as_str())
            || (written == iface.simple_name() && scope.resolve_name(written, ctx).is_none())
    })
}
