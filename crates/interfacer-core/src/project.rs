use std::collections::HashMap;
use std::path::{Path, PathBuf};

use interfacer_classpath::{to_class_def, ClasspathEntry, ClasspathIndex};
use interfacer_syntax::{
    try_to_parse, JavaFile, MethodDecl, ParseFailure, ParseOutcome, TypeDecl, TypeDeclKind,
    TypeParam,
};
use interfacer_types::{ClassDef, ClassKind, MethodDef, TypeParamDef, TypeRef, TypeStore};

use crate::resolve::{DeclContext, FileScope};
use crate::RetrofitError;

/// Everything one pass works on: the classpath index, the type store built from the minimal
/// JDK, the classpath and all parsed sources, and the parsed files themselves.
#[derive(Debug)]
pub struct Snapshot {
    pub classpath: ClasspathIndex,
    pub store: TypeStore,
    /// Every successfully parsed file, each path once.
    pub files: Vec<JavaFile>,
    /// Indices into `files` of the project (scan directory) files.
    pub project: Vec<usize>,
    /// Indices into `files` of the interface source files.
    pub interface_sources: Vec<usize>,
    pub failures: Vec<ParseFailure>,
}

impl Snapshot {
    /// Indexes the classpath and parses both source roots. A root that is both the scan
    /// directory and the interface directory (or contains it) is parsed once.
    pub fn load(
        scan_dir: &Path,
        interfaces_dir: Option<&Path>,
        classpath: &[ClasspathEntry],
    ) -> Result<Self, RetrofitError> {
        let index = ClasspathIndex::build(classpath)?;

        let mut snapshot = Snapshot {
            classpath: index,
            store: TypeStore::with_minimal_jdk(),
            files: Vec::new(),
            project: Vec::new(),
            interface_sources: Vec::new(),
            failures: Vec::new(),
        };
        let mut by_path: HashMap<PathBuf, usize> = HashMap::new();

        let project = snapshot.parse_root(scan_dir, &mut by_path)?;
        snapshot.project = project;
        if let Some(dir) = interfaces_dir {
            let sources = snapshot.parse_root(dir, &mut by_path)?;
            snapshot.interface_sources = sources;
        }

        for stub in snapshot.classpath.stubs() {
            snapshot.store.upsert_class(to_class_def(stub));
        }
        populate_sources(&mut snapshot.store, &snapshot.files);

        tracing::debug!(
            target: "interfacer.project",
            classes = snapshot.store.len(),
            files = snapshot.files.len(),
            failures = snapshot.failures.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    fn parse_root(
        &mut self,
        root: &Path,
        by_path: &mut HashMap<PathBuf, usize>,
    ) -> Result<Vec<usize>, RetrofitError> {
        let mut indices = Vec::new();
        for outcome in try_to_parse(root)? {
            let key = std::fs::canonicalize(outcome.path())
                .unwrap_or_else(|_| outcome.path().to_path_buf());
            if let Some(&idx) = by_path.get(&key) {
                indices.push(idx);
                continue;
            }
            match outcome {
                ParseOutcome::Parsed(file) => {
                    let idx = self.files.len();
                    self.files.push(file);
                    by_path.insert(key, idx);
                    indices.push(idx);
                }
                ParseOutcome::Failed(failure) => {
                    if !self.failures.iter().any(|f| f.path == failure.path) {
                        self.failures.push(failure);
                    }
                }
            }
        }
        Ok(indices)
    }

    pub fn project_files(&self) -> impl Iterator<Item = &JavaFile> {
        self.project.iter().map(|&idx| &self.files[idx])
    }

    pub fn interface_files(&self) -> impl Iterator<Item = &JavaFile> {
        self.interface_sources.iter().map(|&idx| &self.files[idx])
    }

    /// Top-level `class` declarations of the project files, by canonical name.
    pub fn retrofit_targets(&self) -> Vec<String> {
        self.project_files()
            .flat_map(|file| {
                file.types
                    .iter()
                    .filter(|decl| decl.kind == TypeDeclKind::Class)
                    .map(|decl| file.qualified_name(&decl.name))
            })
            .collect()
    }
}

/// Adds every source declaration to `store`, replacing classpath definitions of the same
/// name. Names are registered first so that declarations can refer to each other.
pub(crate) fn populate_sources(store: &mut TypeStore, files: &[JavaFile]) {
    for file in files {
        for decl in &file.types {
            register(store, &file.qualified_name(&decl.name), decl);
        }
    }

    let mut defs = Vec::new();
    for file in files {
        let scope = FileScope::new(file, store);
        for decl in &file.types {
            collect_defs(&scope, &file.qualified_name(&decl.name), decl, &[], &mut defs);
        }
    }
    for def in defs {
        store.upsert_class(def);
    }
}

fn register(store: &mut TypeStore, name: &str, decl: &TypeDecl) {
    store.upsert_class(ClassDef::new(name, class_kind(decl.kind)));
    for member in &decl.members {
        register(store, &format!("{name}.{}", member.name), member);
    }
}

fn collect_defs(
    scope: &FileScope<'_>,
    name: &str,
    decl: &TypeDecl,
    outer: &[String],
    out: &mut Vec<ClassDef>,
) {
    let mut enclosing = vec![name.to_string()];
    enclosing.extend(outer.iter().cloned());
    let ctx = DeclContext {
        type_vars: decl.type_params.iter().map(|tp| tp.name.clone()).collect(),
        enclosing,
    };
    out.push(class_def(scope, name, decl, &ctx));

    for member in &decl.members {
        collect_defs(
            scope,
            &format!("{name}.{}", member.name),
            member,
            &ctx.enclosing,
            out,
        );
    }
}

fn class_kind(kind: TypeDeclKind) -> ClassKind {
    match kind {
        TypeDeclKind::Class => ClassKind::Class,
        TypeDeclKind::Interface => ClassKind::Interface,
        TypeDeclKind::Enum => ClassKind::Enum,
        TypeDeclKind::Record => ClassKind::Record,
        TypeDeclKind::Annotation => ClassKind::Annotation,
    }
}

fn class_def(scope: &FileScope<'_>, name: &str, decl: &TypeDecl, ctx: &DeclContext) -> ClassDef {
    let mut def = ClassDef::new(name, class_kind(decl.kind));
    def.type_params = type_params(scope, &decl.type_params, ctx);
    def.super_class = match decl.kind {
        TypeDeclKind::Class => Some(
            decl.superclass
                .as_ref()
                .map(|sc| scope.resolve_type(sc, ctx))
                .unwrap_or_else(TypeRef::object),
        ),
        TypeDeclKind::Enum => Some(TypeRef::class(
            "java.lang.Enum",
            vec![TypeRef::raw(name)],
        )),
        TypeDeclKind::Record => Some(TypeRef::raw("java.lang.Record")),
        TypeDeclKind::Interface | TypeDeclKind::Annotation => None,
    };
    def.interfaces = decl
        .interfaces
        .iter()
        .map(|ty| scope.resolve_type(ty, ctx))
        .collect();
    def.methods = decl
        .methods
        .iter()
        .map(|method| method_def(scope, method, ctx))
        .collect();
    def
}

fn method_def(scope: &FileScope<'_>, method: &MethodDecl, class_ctx: &DeclContext) -> MethodDef {
    let ctx = class_ctx
        .clone()
        .with_type_vars(method.type_params.iter().map(|tp| tp.name.clone()));
    MethodDef {
        name: method.name.clone(),
        type_params: type_params(scope, &method.type_params, &ctx),
        params: method
            .params
            .iter()
            .map(|p| scope.resolve_type(p, &ctx))
            .collect(),
        return_type: scope.resolve_type(&method.return_type, &ctx),
        is_static: method.is_static,
        is_private: method.is_private,
        is_abstract: method.is_abstract,
    }
}

fn type_params(scope: &FileScope<'_>, params: &[TypeParam], ctx: &DeclContext) -> Vec<TypeParamDef> {
    params
        .iter()
        .map(|tp| TypeParamDef {
            name: tp.name.clone(),
            upper_bounds: tp
                .bounds
                .iter()
                .map(|bound| scope.resolve_type(bound, ctx))
                .collect(),
        })
        .collect()
}
