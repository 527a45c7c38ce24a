use std::path::PathBuf;

use interfacer_syntax::{JavaFile, TypeDeclKind};
use interfacer_types::{Diagnostic, TypeRef, TypeStore};
use serde::Serialize;

use crate::catalog::InterfaceCatalog;
use crate::diagnostics::DiagnosticSink;
use crate::matcher::StructuralMatcher;
use crate::redundancy::{is_covered_by, is_redundant, names_interface};
use crate::resolve::{DeclContext, FileScope};

/// One interface appended to one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modification {
    pub pass: usize,
    pub interface: String,
    pub class: String,
    pub path: PathBuf,
    /// Resolved type arguments in declaration order, Java syntax.
    pub type_arguments: Vec<String>,
    /// The clause entry as written into the source.
    pub clause: String,
}

pub struct RetrofitEngine<'a> {
    store: &'a TypeStore,
    catalog: &'a InterfaceCatalog,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> RetrofitEngine<'a> {
    pub fn new(store: &'a TypeStore, catalog: &'a InterfaceCatalog, sink: &'a dyn DiagnosticSink) -> Self {
        Self { store, catalog, sink }
    }

    /// Evaluates every catalog interface against every top-level class of `file` and
    /// appends the accepted ones to the class's implemented-type clause.
    pub fn retrofit_file(&self, file: &mut JavaFile, pass: usize) -> Vec<Modification> {
        let matcher = StructuralMatcher::new(self.store);
        let scope = FileScope::new(file, self.store);
        let mut out = Vec::new();

        for idx in 0..file.types.len() {
            if file.types[idx].kind != TypeDeclKind::Class {
                continue;
            }
            let class = file.qualified_name(&file.types[idx].name);
            if !self.store.contains(&class) {
                continue;
            }
            let ctx = DeclContext::default()
                .with_type_vars(file.types[idx].type_params.iter().map(|tp| tp.name.clone()));
            // Added earlier in this pass; the snapshot's ancestry does not know them yet.
            let mut appended: Vec<TypeRef> = Vec::new();

            for iface in self.catalog.iter() {
                if iface.name == class {
                    continue;
                }
                let Some(binding) = matcher.match_class(&class, iface) else {
                    continue;
                };
                if is_redundant(self.store, &class, iface)
                    || is_covered_by(self.store, iface, &appended)
                    || names_interface(&file.types[idx], &scope, &ctx, iface)
                {
                    tracing::trace!(target: "interfacer.retrofit", %class, interface = %iface.name, "already implemented");
                    continue;
                }

                let ty = iface.parameterized(&binding);
                let clause = scope.spell(&ty, &ctx);
                let type_arguments = binding
                    .type_arguments(&iface.type_params)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                let modification = Modification {
                    pass,
                    interface: iface.name.clone(),
                    class: class.clone(),
                    path: file.path.clone(),
                    type_arguments,
                    clause: clause.to_string(),
                };
                file.types[idx].interfaces.push(clause);
                appended.push(ty.clone());

                self.sink.emit(Diagnostic::info(
                    "interface-added",
                    format!("{class} now implements {ty}"),
                    Some(file.path.clone()),
                ));
                out.push(modification);
            }
        }
        out
    }

    /// Runs [`Self::retrofit_file`] over the given files.
    pub fn retrofit_all<'f>(&self, files: impl IntoIterator<Item = &'f mut JavaFile>, pass: usize) -> Vec<Modification> {
        files
            .into_iter()
            .flat_map(|file| self.retrofit_file(file, pass))
            .collect()
    }
}
