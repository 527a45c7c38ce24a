use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::ty::{Substitution, TypeRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum InterfaceOrigin {
    Classpath,
    Source(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub name: String,
    pub return_type: TypeRef,
    pub params: Vec<TypeRef>,
}

impl MethodSignature {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// An interface as the matcher sees it: a name, its type parameters and the instance
/// methods a class has to provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub type_params: Vec<String>,
    pub methods: Vec<MethodSignature>,
    pub origin: InterfaceOrigin,
}

impl InterfaceDescriptor {
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn is_type_param(&self, name: &str) -> bool {
        self.type_params.iter().any(|tp| tp == name)
    }

    pub fn raw_type(&self) -> TypeRef {
        TypeRef::raw(self.name.clone())
    }

    /// The interface instantiated with `binding`, type arguments in declaration order.
    pub fn parameterized(&self, binding: &TypeVariableBinding) -> TypeRef {
        TypeRef::class(self.name.clone(), binding.type_arguments(&self.type_params))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type variable `{name}` already bound to `{existing}`, cannot rebind to `{proposed}`")]
pub struct BindingConflict {
    pub name: String,
    pub existing: TypeRef,
    pub proposed: TypeRef,
}

/// Interface type variable -> concrete type, for one (class, interface) match attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeVariableBinding {
    entries: BTreeMap<String, TypeRef>,
}

impl TypeVariableBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `ty`. Rebinding to the same type is a no-op; rebinding to a different
    /// type is a conflict and leaves the binding untouched.
    pub fn bind(&mut self, name: &str, ty: TypeRef) -> Result<(), BindingConflict> {
        match self.entries.get(name) {
            Some(existing) if *existing == ty => Ok(()),
            Some(existing) => Err(BindingConflict {
                name: name.to_string(),
                existing: existing.clone(),
                proposed: ty,
            }),
            None => {
                self.entries.insert(name.to_string(), ty);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeRef> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_substitution(&self) -> &Substitution {
        &self.entries
    }

    pub fn substitute(&self, ty: &TypeRef) -> TypeRef {
        ty.substitute(&self.entries)
    }

    /// Resolved arguments for `params`; anything left unbound is `java.lang.Object`.
    pub fn type_arguments(&self, params: &[String]) -> Vec<TypeRef> {
        params
            .iter()
            .map(|p| self.entries.get(p).cloned().unwrap_or_else(TypeRef::object))
            .collect()
    }
}
