use interfacer_syntax::{BoundKind, Import, JavaFile, SyntaxType};
use interfacer_types::{PrimitiveType, TypeRef, TypeStore, WildcardBound};

/// Type variables and enclosing types visible at one point of a compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclContext {
    pub type_vars: Vec<String>,
    /// Canonical names of the enclosing type declarations, innermost first. Their member
    /// types are in scope.
    pub enclosing: Vec<String>,
}

impl DeclContext {
    pub fn with_type_vars(mut self, vars: impl IntoIterator<Item = String>) -> Self {
        self.type_vars.extend(vars);
        self
    }

    fn is_type_var(&self, name: &str) -> bool {
        self.type_vars.iter().any(|tv| tv == name)
    }
}

/// Resolves written type names inside one compilation unit against a [`TypeStore`].
///
/// Lookup order for the first segment of a name: member types of enclosing declarations,
/// top-level types of the file, single-type imports, the file's package, on-demand imports,
/// `java.lang`. Remaining segments select nested types.
#[derive(Debug, Clone)]
pub struct FileScope<'a> {
    store: &'a TypeStore,
    package: String,
    imports: Vec<Import>,
    top_level: Vec<String>,
}

impl<'a> FileScope<'a> {
    pub fn new(file: &JavaFile, store: &'a TypeStore) -> Self {
        Self {
            store,
            package: file.package_name().to_string(),
            imports: file.imports.clone(),
            top_level: file.types.iter().map(|decl| decl.name.clone()).collect(),
        }
    }

    pub fn qualify(&self, simple_name: &str) -> String {
        if self.package.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}.{simple_name}", self.package)
        }
    }

    /// Canonical name of a written (simple, partially or fully qualified) type name, if the
    /// store knows it.
    pub fn resolve_name(&self, written: &str, ctx: &DeclContext) -> Option<String> {
        let (first, rest) = match written.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (written, None),
        };
        let complete = |base: String| -> Option<String> {
            let full = match rest {
                Some(rest) => format!("{base}.{rest}"),
                None => base,
            };
            self.store.contains(&full).then_some(full)
        };

        for outer in &ctx.enclosing {
            if let Some(hit) = complete(format!("{outer}.{first}")) {
                return Some(hit);
            }
        }
        if self.top_level.iter().any(|name| name == first) {
            if let Some(hit) = complete(self.qualify(first)) {
                return Some(hit);
            }
        }
        for import in self.imports.iter().filter(|i| !i.on_demand) {
            if last_segment(&import.path) == first {
                if let Some(hit) = complete(import.path.clone()) {
                    return Some(hit);
                }
            }
        }
        if let Some(hit) = complete(self.qualify(first)) {
            return Some(hit);
        }
        for import in self.imports.iter().filter(|i| i.on_demand) {
            if let Some(hit) = complete(format!("{}.{first}", import.path)) {
                return Some(hit);
            }
        }
        if let Some(hit) = complete(format!("java.lang.{first}")) {
            return Some(hit);
        }

        if rest.is_some() && self.store.contains(written) {
            return Some(written.to_string());
        }
        None
    }

    /// Best-effort canonical name for a type the store does not know. The result stays
    /// unresolved, so the oracle reports it when it matters.
    fn guess_name(&self, written: &str) -> String {
        let (first, rest) = match written.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (written, None),
        };
        let imported = self
            .imports
            .iter()
            .find(|i| !i.on_demand && last_segment(&i.path) == first);
        match (imported, rest) {
            (Some(import), Some(rest)) => format!("{}.{rest}", import.path),
            (Some(import), None) => import.path.clone(),
            (None, Some(_)) if first.starts_with(|c: char| c.is_ascii_lowercase()) => {
                written.to_string()
            }
            (None, _) => self.qualify(written),
        }
    }

    pub fn resolve_type(&self, ty: &SyntaxType, ctx: &DeclContext) -> TypeRef {
        match ty {
            SyntaxType::Void => TypeRef::Void,
            SyntaxType::Primitive(keyword) => PrimitiveType::from_java_name(keyword)
                .map(TypeRef::Primitive)
                .unwrap_or_else(|| TypeRef::raw(keyword.clone())),
            SyntaxType::Named { name, args } => {
                if args.is_empty() && ctx.is_type_var(name) {
                    return TypeRef::TypeVar(name.clone());
                }
                let canonical = self
                    .resolve_name(name, ctx)
                    .unwrap_or_else(|| self.guess_name(name));
                TypeRef::class(
                    canonical,
                    args.iter().map(|arg| self.resolve_type(arg, ctx)).collect(),
                )
            }
            SyntaxType::Array(elem) => TypeRef::array(self.resolve_type(elem, ctx)),
            SyntaxType::Wildcard(None) => TypeRef::Wildcard(WildcardBound::Unbounded),
            SyntaxType::Wildcard(Some((BoundKind::Extends, bound))) => TypeRef::Wildcard(
                WildcardBound::Extends(Box::new(self.resolve_type(bound, ctx))),
            ),
            SyntaxType::Wildcard(Some((BoundKind::Super, bound))) => TypeRef::Wildcard(
                WildcardBound::Super(Box::new(self.resolve_type(bound, ctx))),
            ),
            SyntaxType::Unknown(text) => TypeRef::raw(text.clone()),
        }
    }

    /// The shortest spelling of `qualified` that resolves back to it in this file.
    pub fn shortest_name(&self, qualified: &str, ctx: &DeclContext) -> String {
        let segments: Vec<&str> = qualified.split('.').collect();
        for take in 1..segments.len() {
            let candidate = segments[segments.len() - take..].join(".");
            if take == 1 && ctx.is_type_var(&candidate) {
                continue;
            }
            if self.resolve_name(&candidate, ctx).as_deref() == Some(qualified) {
                return candidate;
            }
        }
        qualified.to_string()
    }

    /// Renders a resolved type back into source form.
    pub fn spell(&self, ty: &TypeRef, ctx: &DeclContext) -> SyntaxType {
        match ty {
            TypeRef::Void => SyntaxType::Void,
            TypeRef::Primitive(prim) => SyntaxType::Primitive(prim.java_name().to_string()),
            TypeRef::Class { name, args } => SyntaxType::named(
                self.shortest_name(name, ctx),
                args.iter().map(|arg| self.spell(arg, ctx)).collect(),
            ),
            TypeRef::Array(elem) => SyntaxType::Array(Box::new(self.spell(elem, ctx))),
            TypeRef::TypeVar(name) => SyntaxType::named(name.clone(), Vec::new()),
            TypeRef::Wildcard(WildcardBound::Unbounded) => SyntaxType::Wildcard(None),
            TypeRef::Wildcard(WildcardBound::Extends(bound)) => SyntaxType::Wildcard(Some((
                BoundKind::Extends,
                Box::new(self.spell(bound, ctx)),
            ))),
            TypeRef::Wildcard(WildcardBound::Super(bound)) => SyntaxType::Wildcard(Some((
                BoundKind::Super,
                Box::new(self.spell(bound, ctx)),
            ))),
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
