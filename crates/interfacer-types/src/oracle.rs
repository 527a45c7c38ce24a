use std::collections::{HashSet, VecDeque};

use thiserror::Error;

use crate::store::{ClassDef, MethodDef, TypeStore};
use crate::ty::{PrimitiveType, TypeRef, WildcardBound};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("cannot resolve type `{0}`")]
    Unresolved(String),
    #[error("type variable `{0}` has no binding in this context")]
    UnboundTypeVariable(String),
}

/// Name resolution and assignability queries over a project snapshot.
pub trait TypeOracle {
    fn resolve(&self, name: &str) -> Option<&ClassDef>;

    /// Whether a value of type `candidate` can be assigned to a variable of type `target`
    /// (JLS 5.2 assignment contexts, without constant narrowing).
    fn is_assignable(&self, target: &TypeRef, candidate: &TypeRef) -> Result<bool, OracleError>;

    /// Transitive supertypes of `class`, nearest first, instantiated against the class's own
    /// type variables. Ancestors that cannot be resolved are listed but not expanded.
    fn ancestors_of(&self, class: &str) -> Result<Vec<TypeRef>, OracleError>;

    /// Declared and inherited (superclass chain) methods, declared first.
    fn methods_of(&self, class: &str) -> Result<Vec<MethodDef>, OracleError>;

    /// `ty` viewed as the supertype `class`: `ArrayList<String>` as `java.util.List` is
    /// `List<String>`. `Ok(None)` when `class` is not a supertype of `ty`.
    fn supertype_view(&self, ty: &TypeRef, class: &str) -> Result<Option<TypeRef>, OracleError>;
}

impl TypeOracle for TypeStore {
    fn resolve(&self, name: &str) -> Option<&ClassDef> {
        self.class(name)
    }

    fn is_assignable(&self, target: &TypeRef, candidate: &TypeRef) -> Result<bool, OracleError> {
        if target == candidate {
            return Ok(true);
        }

        match (target, candidate) {
            (TypeRef::Void, _) | (_, TypeRef::Void) => Ok(false),

            (TypeRef::Primitive(t), TypeRef::Primitive(c)) => Ok(c.widens_to(*t)),
            // Unboxing, then widening.
            (TypeRef::Primitive(t), TypeRef::Class { name, .. }) => {
                Ok(PrimitiveType::unboxed(name).is_some_and(|c| c == *t || c.widens_to(*t)))
            }
            // Boxing, then reference widening.
            (TypeRef::Class { .. }, TypeRef::Primitive(_)) => {
                self.is_assignable(target, &candidate.boxed())
            }

            (TypeRef::Class { name, .. }, TypeRef::Array(_)) => Ok(matches!(
                name.as_str(),
                crate::JAVA_LANG_OBJECT | "java.lang.Cloneable" | "java.io.Serializable"
            )),
            (TypeRef::Array(t), TypeRef::Array(c)) => match (t.as_ref(), c.as_ref()) {
                (TypeRef::Primitive(_), _) | (_, TypeRef::Primitive(_)) => Ok(t == c),
                _ => self.is_assignable(t, c),
            },
            (TypeRef::Array(_), _) => Ok(false),

            (TypeRef::TypeVar(t), TypeRef::TypeVar(c)) if t == c => Ok(true),
            (_, TypeRef::TypeVar(_)) if target.is_object() => Ok(true),
            (TypeRef::TypeVar(name), _) | (_, TypeRef::TypeVar(name)) => {
                Err(OracleError::UnboundTypeVariable(name.clone()))
            }

            (TypeRef::Class { .. }, TypeRef::Class { .. }) => self.is_reference_subtype(target, candidate),

            (TypeRef::Wildcard(_), _) | (_, TypeRef::Wildcard(_)) => Ok(false),
            (TypeRef::Primitive(_), _) => Ok(false),
        }
    }

    fn ancestors_of(&self, class: &str) -> Result<Vec<TypeRef>, OracleError> {
        let def = self
            .class(class)
            .ok_or_else(|| OracleError::Unresolved(class.to_string()))?;

        let mut out = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(def.name.clone());
        let mut queue: VecDeque<TypeRef> = def.direct_supertypes().into();

        while let Some(current) = queue.pop_front() {
            let TypeRef::Class { name, args } = &current else {
                continue;
            };
            if !seen.insert(name.clone()) {
                continue;
            }
            match self.class(name) {
                Some(super_def) => {
                    let subst = super_def.substitution_for(args);
                    queue.extend(
                        super_def
                            .direct_supertypes()
                            .iter()
                            .map(|ty| ty.substitute(&subst)),
                    );
                }
                None => {
                    tracing::debug!(target: "interfacer.oracle", class, ancestor = %name, "unresolved ancestor");
                }
            }
            out.push(current);
        }

        Ok(out)
    }

    fn methods_of(&self, class: &str) -> Result<Vec<MethodDef>, OracleError> {
        let def = self
            .class(class)
            .ok_or_else(|| OracleError::Unresolved(class.to_string()))?;

        let mut out: Vec<MethodDef> = def.methods.clone();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(def.name.clone());
        let mut next = def.super_class.clone();

        while let Some(TypeRef::Class { name, args }) = next.take() {
            if !seen.insert(name.clone()) {
                break;
            }
            let Some(super_def) = self.class(&name) else {
                tracing::debug!(target: "interfacer.oracle", class, superclass = %name, "superclass chain ends at unresolved type");
                break;
            };
            let subst = super_def.substitution_for(&args);
            out.extend(super_def.methods.iter().map(|m| m.substitute(&subst)));
            next = super_def.super_class.as_ref().map(|sc| sc.substitute(&subst));
        }

        Ok(out)
    }

    fn supertype_view(&self, ty: &TypeRef, class: &str) -> Result<Option<TypeRef>, OracleError> {
        let TypeRef::Class { .. } = ty else {
            return Ok(None);
        };

        let mut queue: VecDeque<TypeRef> = VecDeque::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut unresolved: Option<String> = None;
        queue.push_back(ty.clone());

        while let Some(current) = queue.pop_front() {
            let TypeRef::Class { name, args } = &current else {
                continue;
            };
            if name == class {
                return Ok(Some(current));
            }
            if !seen.insert(name.clone()) {
                continue;
            }
            let Some(def) = self.class(name) else {
                unresolved.get_or_insert_with(|| name.clone());
                continue;
            };

            // A raw instantiation stays raw all the way up.
            let raw = args.is_empty() && !def.type_params.is_empty();
            for super_ty in def.direct_supertypes() {
                let next = if raw {
                    super_ty.erasure()
                } else {
                    super_ty.substitute(&def.substitution_for(args))
                };
                queue.push_back(next);
            }
        }

        match unresolved {
            Some(name) => Err(OracleError::Unresolved(name)),
            None => Ok(None),
        }
    }
}

impl TypeStore {
    fn is_reference_subtype(&self, target: &TypeRef, candidate: &TypeRef) -> Result<bool, OracleError> {
        let TypeRef::Class {
            name: target_name,
            args: target_args,
        } = target
        else {
            return Ok(false);
        };
        if target.is_object() {
            return Ok(true);
        }

        let Some(view) = self.supertype_view(candidate, target_name)? else {
            return Ok(false);
        };
        let TypeRef::Class { args: view_args, .. } = &view else {
            return Ok(false);
        };

        // Raw target, or unchecked conversion from a raw candidate.
        if target_args.is_empty() || view_args.is_empty() {
            return Ok(true);
        }
        if target_args.len() != view_args.len() {
            return Ok(false);
        }
        for (t, v) in target_args.iter().zip(view_args) {
            if !self.contains_type_argument(t, v)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Type argument containment (JLS 4.5.1).
    fn contains_type_argument(&self, target: &TypeRef, arg: &TypeRef) -> Result<bool, OracleError> {
        match target {
            TypeRef::Wildcard(WildcardBound::Unbounded) => Ok(true),
            TypeRef::Wildcard(WildcardBound::Extends(bound)) => match arg {
                TypeRef::Wildcard(WildcardBound::Extends(inner)) => {
                    self.is_reference_assignable(bound, inner)
                }
                TypeRef::Wildcard(_) => Ok(bound.is_object()),
                concrete => self.is_reference_assignable(bound, concrete),
            },
            TypeRef::Wildcard(WildcardBound::Super(bound)) => match arg {
                TypeRef::Wildcard(WildcardBound::Super(inner)) => {
                    self.is_reference_assignable(inner, bound)
                }
                TypeRef::Wildcard(_) => Ok(false),
                concrete => self.is_reference_assignable(concrete, bound),
            },
            exact => Ok(exact == arg),
        }
    }

    fn is_reference_assignable(&self, target: &TypeRef, candidate: &TypeRef) -> Result<bool, OracleError> {
        if matches!(target, TypeRef::Primitive(_)) || matches!(candidate, TypeRef::Primitive(_)) {
            return Ok(target == candidate);
        }
        self.is_assignable(target, candidate)
    }
}
