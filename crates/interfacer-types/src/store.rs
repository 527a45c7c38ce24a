use std::collections::BTreeMap;

use serde::Serialize;

use crate::ty::{Substitution, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeParamDef {
    pub name: String,
    /// Declared bounds; empty means `java.lang.Object`.
    pub upper_bounds: Vec<TypeRef>,
}

impl TypeParamDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            upper_bounds: Vec::new(),
        }
    }

    /// First bound, or `java.lang.Object`.
    pub fn erasure(&self) -> TypeRef {
        self.upper_bounds
            .first()
            .map(TypeRef::erasure)
            .unwrap_or_else(TypeRef::object)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeParamDef>,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub is_static: bool,
    pub is_private: bool,
    pub is_abstract: bool,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params,
            return_type,
            is_static: false,
            is_private: false,
            is_abstract: false,
        }
    }

    pub fn is_instance_api(&self) -> bool {
        !self.is_static && !self.is_private
    }

    /// Applies `subst` to the parameter and return types.
    pub fn substitute(&self, subst: &Substitution) -> MethodDef {
        MethodDef {
            params: self.params.iter().map(|p| p.substitute(subst)).collect(),
            return_type: self.return_type.substitute(subst),
            ..self.clone()
        }
    }

    /// Replaces the method's own type variables with their erasure.
    pub fn erase_method_type_params(&self) -> MethodDef {
        if self.type_params.is_empty() {
            return self.clone();
        }
        let subst: Substitution = self
            .type_params
            .iter()
            .map(|tp| (tp.name.clone(), tp.erasure()))
            .collect();
        MethodDef {
            type_params: Vec::new(),
            ..self.substitute(&subst)
        }
    }
}

/// A type declaration, normalised from either a classfile or a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDef {
    /// Canonical dotted name.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeParamDef>,
    pub super_class: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn type_param_names(&self) -> Vec<String> {
        self.type_params.iter().map(|tp| tp.name.clone()).collect()
    }

    /// The generic self type, e.g. `Box<T>` for `class Box<T>`.
    pub fn self_type(&self) -> TypeRef {
        TypeRef::class(
            self.name.clone(),
            self.type_params
                .iter()
                .map(|tp| TypeRef::TypeVar(tp.name.clone()))
                .collect(),
        )
    }

    /// Maps the class's type parameters to `args`. Raw or short argument lists erase the
    /// remaining parameters.
    pub fn substitution_for(&self, args: &[TypeRef]) -> Substitution {
        self.type_params
            .iter()
            .enumerate()
            .map(|(idx, tp)| {
                let arg = args.get(idx).cloned().unwrap_or_else(|| tp.erasure());
                (tp.name.clone(), arg)
            })
            .collect()
    }

    /// Direct supertypes in declaration order, with `java.lang.Object` implied for interfaces.
    pub fn direct_supertypes(&self) -> Vec<TypeRef> {
        let mut out: Vec<TypeRef> = self.super_class.iter().cloned().collect();
        out.extend(self.interfaces.iter().cloned());
        if self.is_interface() && out.iter().all(|ty| !ty.is_object()) {
            out.push(TypeRef::object());
        }
        out
    }
}

/// All known type declarations, keyed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct TypeStore {
    classes: BTreeMap<String, ClassDef>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a definition, returning the previous one.
    pub fn upsert_class(&mut self, def: ClassDef) -> Option<ClassDef> {
        self.classes.insert(def.name.clone(), def)
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn raw_substitution_erases_to_bounds() {
        let mut def = ClassDef::new("p.Sorted", ClassKind::Class);
        def.type_params = vec![
            TypeParamDef {
                name: "T".into(),
                upper_bounds: vec![TypeRef::class(
                    "java.lang.Comparable",
                    vec![TypeRef::TypeVar("T".into())],
                )],
            },
            TypeParamDef::new("U"),
        ];

        let subst = def.substitution_for(&[]);
        assert_eq!(subst["T"], TypeRef::raw("java.lang.Comparable"));
        assert_eq!(subst["U"], TypeRef::object());
        assert_eq!(def.self_type().to_string(), "p.Sorted<T, U>");
    }

    #[test]
    fn method_type_params_are_erased() {
        let mut method = MethodDef::new(
            "first",
            vec![TypeRef::class(
                "java.util.List",
                vec![TypeRef::TypeVar("X".into())],
            )],
            TypeRef::TypeVar("X".into()),
        );
        method.type_params = vec![TypeParamDef {
            name: "X".into(),
            upper_bounds: vec![TypeRef::raw("java.lang.Number")],
        }];

        let erased = method.erase_method_type_params();
        assert!(erased.type_params.is_empty());
        assert_eq!(erased.return_type, TypeRef::raw("java.lang.Number"));
        assert_eq!(
            erased.params[0].to_string(),
            "java.util.List<java.lang.Number>"
        );
    }

    #[test]
    fn interfaces_imply_object() {
        let mut def = ClassDef::new("p.Named", ClassKind::Interface);
        def.interfaces = vec![TypeRef::raw("p.Base")];
        assert_eq!(
            def.direct_supertypes(),
            vec![TypeRef::raw("p.Base"), TypeRef::object()]
        );
    }
}
