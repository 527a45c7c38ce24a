use std::collections::HashSet;

use interfacer_classpath::internal_to_canonical;
use interfacer_syntax::TypeDeclKind;
use interfacer_types::{
    is_object_method, ClassKind, InterfaceDescriptor, InterfaceOrigin, MethodDef,
    MethodSignature, Substitution, TypeRef, TypeStore,
};
use serde::Serialize;

use crate::project::Snapshot;

/// Interface descriptors of one pass, most demanding (largest method set) first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterfaceCatalog {
    entries: Vec<InterfaceDescriptor>,
}

impl InterfaceCatalog {
    /// Collects classpath interfaces beneath `packages`, then every top-level interface of
    /// the interface sources.
    pub fn build(snapshot: &Snapshot, packages: &[String]) -> Self {
        let mut candidates: Vec<(String, InterfaceOrigin)> = Vec::new();
        if !packages.is_empty() {
            for stub in snapshot.classpath.interfaces_in_packages(packages) {
                candidates.push((
                    internal_to_canonical(&stub.internal_name),
                    InterfaceOrigin::Classpath,
                ));
            }
        }
        for file in snapshot.interface_files() {
            for decl in &file.types {
                if decl.kind == TypeDeclKind::Interface {
                    candidates.push((
                        file.qualified_name(&decl.name),
                        InterfaceOrigin::Source(file.path.clone()),
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (name, origin) in candidates {
            if !seen.insert(name.clone()) {
                continue;
            }
            match describe(&snapshot.store, &name, origin) {
                Some(descriptor) => entries.push(descriptor),
                None => {
                    tracing::debug!(target: "interfacer.catalog", interface = %name, "not an interface in this snapshot");
                }
            }
        }
        Self::from_descriptors(entries)
    }

    /// Orders `entries` by descending method count, then by name.
    pub fn from_descriptors(mut entries: Vec<InterfaceDescriptor>) -> Self {
        entries.sort_by(|a, b| {
            b.methods
                .len()
                .cmp(&a.methods.len())
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceDescriptor> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceDescriptor> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Describes the interface `name` as stored in `store`, or `None` if the store has no
/// interface of that name.
pub fn describe(store: &TypeStore, name: &str, origin: InterfaceOrigin) -> Option<InterfaceDescriptor> {
    let def = store.class(name)?;
    if def.kind != ClassKind::Interface {
        return None;
    }

    let mut methods: Vec<MethodSignature> = Vec::new();
    let mut visited = HashSet::new();
    collect_methods(store, name, &Substitution::new(), &mut visited, &mut methods);

    Some(InterfaceDescriptor {
        name: def.name.clone(),
        type_params: def.type_param_names(),
        methods,
        origin,
    })
}

fn collect_methods(
    store: &TypeStore,
    name: &str,
    subst: &Substitution,
    visited: &mut HashSet<String>,
    out: &mut Vec<MethodSignature>,
) {
    if !visited.insert(name.to_string()) {
        return;
    }
    let Some(def) = store.class(name) else {
        tracing::debug!(target: "interfacer.catalog", interface = name, "unresolved super-interface");
        return;
    };

    for method in def.methods.iter().filter(|m| m.is_instance_api()) {
        let method: MethodDef = method.erase_method_type_params().substitute(subst);
        if is_object_method(&method) {
            continue;
        }
        if out
            .iter()
            .any(|existing| existing.name == method.name && existing.params == method.params)
        {
            continue;
        }
        out.push(MethodSignature {
            name: method.name,
            return_type: method.return_type,
            params: method.params,
        });
    }

    for super_iface in &def.interfaces {
        let TypeRef::Class { name: super_name, args } = super_iface.substitute(subst) else {
            continue;
        };
        let super_subst = store
            .class(&super_name)
            .map(|super_def| super_def.substitution_for(&args))
            .unwrap_or_default();
        collect_methods(store, &super_name, &super_subst, visited, out);
    }
}
