use interfacer_types::{
    InterfaceDescriptor, MethodDef, MethodSignature, TypeOracle, TypeRef, TypeVariableBinding,
    WildcardBound,
};

/// Decides whether a class structurally provides every method of an interface.
pub struct StructuralMatcher<'a, O: TypeOracle + ?Sized> {
    oracle: &'a O,
}

impl<'a, O: TypeOracle + ?Sized> StructuralMatcher<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }

    /// The binding of the interface's type parameters under which `class` conforms to
    /// `iface`, or `None`. Marker interfaces never match.
    pub fn match_class(&self, class: &str, iface: &InterfaceDescriptor) -> Option<TypeVariableBinding> {
        if iface.methods.is_empty() {
            return None;
        }
        let candidates: Vec<MethodDef> = match self.oracle.methods_of(class) {
            Ok(methods) => methods
                .iter()
                .filter(|m| m.is_instance_api())
                .map(MethodDef::erase_method_type_params)
                .collect(),
            Err(err) => {
                tracing::debug!(target: "interfacer.match", class, %err, "cannot list methods");
                return None;
            }
        };

        let mut binding = TypeVariableBinding::new();
        for wanted in &iface.methods {
            let accepted = candidates
                .iter()
                .filter(|c| c.name == wanted.name && c.params.len() == wanted.arity())
                .find_map(|candidate| {
                    let mut trial = binding.clone();
                    self.accepts(iface, wanted, candidate, &mut trial)
                        .then_some(trial)
                });
            match accepted {
                Some(next) => binding = next,
                None => {
                    tracing::trace!(target: "interfacer.match", class, interface = %iface.name, method = %wanted.name, "no conforming candidate");
                    return None;
                }
            }
        }
        Some(binding)
    }

    fn accepts(
        &self,
        iface: &InterfaceDescriptor,
        wanted: &MethodSignature,
        candidate: &MethodDef,
        binding: &mut TypeVariableBinding,
    ) -> bool {
        if wanted.return_type.is_primitive_or_void() {
            if wanted.return_type != candidate.return_type {
                return false;
            }
        } else if !self.check(iface, &wanted.return_type, &candidate.return_type, binding) {
            return false;
        }

        wanted
            .params
            .iter()
            .zip(&candidate.params)
            .all(|(param, actual)| self.check(iface, param, actual, binding))
    }

    /// Unifies `pattern` against `actual`, then requires `actual` to be assignable to the
    /// substituted pattern.
    fn check(
        &self,
        iface: &InterfaceDescriptor,
        pattern: &TypeRef,
        actual: &TypeRef,
        binding: &mut TypeVariableBinding,
    ) -> bool {
        if !self.unify(iface, pattern, actual, binding) {
            return false;
        }
        let target = binding.substitute(pattern);
        match self.oracle.is_assignable(&target, actual) {
            Ok(ok) => ok,
            Err(err) => {
                tracing::debug!(target: "interfacer.match", %target, %actual, %err, "assignability undecidable");
                false
            }
        }
    }

    /// Binds the interface type variables met while walking `pattern` against `actual`.
    /// Returns `false` on a conflicting or unrepresentable binding.
    fn unify(
        &self,
        iface: &InterfaceDescriptor,
        pattern: &TypeRef,
        actual: &TypeRef,
        binding: &mut TypeVariableBinding,
    ) -> bool {
        match pattern {
            TypeRef::TypeVar(var) if iface.is_type_param(var) => {
                // Type arguments are reference types; boxing would not override.
                if matches!(actual, TypeRef::Void | TypeRef::Primitive(_) | TypeRef::Wildcard(_)) {
                    return false;
                }
                match binding.bind(var, actual.clone()) {
                    Ok(()) => true,
                    Err(conflict) => {
                        tracing::trace!(target: "interfacer.match", %conflict, "binding conflict");
                        false
                    }
                }
            }
            TypeRef::Class { name, args } if !args.is_empty() => {
                let view = match self.oracle.supertype_view(actual, name) {
                    Ok(view) => view,
                    Err(err) => {
                        tracing::debug!(target: "interfacer.match", %actual, supertype = %name, %err, "supertype view unavailable");
                        None
                    }
                };
                match view {
                    Some(TypeRef::Class { args: actual_args, .. }) if actual_args.len() == args.len() => args
                        .iter()
                        .zip(&actual_args)
                        .all(|(p, a)| self.unify(iface, p, a, binding)),
                    // Raw or unrelated: nothing to bind, assignability decides.
                    _ => true,
                }
            }
            TypeRef::Array(elem) => match actual {
                TypeRef::Array(actual_elem) => self.unify(iface, elem, actual_elem, binding),
                _ => true,
            },
            TypeRef::Wildcard(WildcardBound::Extends(bound) | WildcardBound::Super(bound)) => {
                let inner = match actual {
                    TypeRef::Wildcard(WildcardBound::Extends(b) | WildcardBound::Super(b)) => b.as_ref(),
                    TypeRef::Wildcard(WildcardBound::Unbounded) => return true,
                    other => other,
                };
                self.unify(iface, bound, inner, binding)
            }
            _ => true,
        }
    }
}
