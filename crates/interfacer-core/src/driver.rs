use std::collections::HashSet;
use std::path::PathBuf;

use interfacer_classpath::ClasspathEntry;
use interfacer_syntax::save_all;
use interfacer_types::Diagnostic;
use serde::Serialize;

use crate::catalog::InterfaceCatalog;
use crate::diagnostics::DiagnosticSink;
use crate::project::Snapshot;
use crate::retrofit::{Modification, RetrofitEngine};
use crate::RetrofitError;

/// Inputs of one retrofit run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrofitOptions {
    /// Root of the classes to retrofit.
    pub scan_dir: PathBuf,
    /// Root of hand-written interface sources.
    pub interfaces_dir: Option<PathBuf>,
    /// Package prefixes selecting classpath interfaces.
    pub interface_packages: Vec<String>,
    pub classpath: Vec<ClasspathEntry>,
    /// Overrides the `(classes × interfaces) + 1` pass cap.
    pub max_passes: Option<usize>,
}

impl RetrofitOptions {
    /// Interfaces have to come from somewhere: a source directory, or a package filter
    /// applied to a non-empty classpath.
    pub fn validate(&self) -> Result<(), RetrofitError> {
        let from_classpath = !self.interface_packages.is_empty() && !self.classpath.is_empty();
        if self.interfaces_dir.is_none() && !from_classpath {
            return Err(RetrofitError::NoInterfaceSource);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Scanning { pass: usize },
    Converged { passes: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub pass: usize,
    pub classes: usize,
    pub interfaces: usize,
    pub modifications: usize,
    pub files_written: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetrofitReport {
    pub passes: Vec<PassSummary>,
    pub modifications: Vec<Modification>,
    /// Files that failed to parse in the final pass.
    pub parse_failures: usize,
}

impl RetrofitReport {
    /// Modification count of each pass, in order.
    pub fn pass_counts(&self) -> Vec<usize> {
        self.passes.iter().map(|p| p.modifications).collect()
    }
}

/// Runs catalog → match → retrofit → persist passes until one pass changes nothing.
pub struct Retrofitter<'a> {
    options: RetrofitOptions,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> Retrofitter<'a> {
    pub fn new(options: RetrofitOptions, sink: &'a dyn DiagnosticSink) -> Self {
        Self { options, sink }
    }

    pub fn options(&self) -> &RetrofitOptions {
        &self.options
    }

    pub fn run(&self) -> Result<RetrofitReport, RetrofitError> {
        self.options.validate()?;

        let mut report = RetrofitReport::default();
        let mut state = DriverState::Scanning { pass: 1 };

        while let DriverState::Scanning { pass } = state {
            let mut snapshot = self.load()?;
            let catalog = InterfaceCatalog::build(&snapshot, &self.options.interface_packages);
            let classes = snapshot.retrofit_targets().len();

            let cap = self
                .options
                .max_passes
                .unwrap_or_else(|| classes.saturating_mul(catalog.len()).saturating_add(1));
            if pass > cap {
                return Err(RetrofitError::NoConvergence { passes: pass - 1 });
            }

            let _span = tracing::info_span!(target: "interfacer.driver", "pass", pass).entered();
            tracing::debug!(target: "interfacer.driver", classes, interfaces = catalog.len(), "starting pass");

            let project: HashSet<usize> = snapshot.project.iter().copied().collect();
            let engine = RetrofitEngine::new(&snapshot.store, &catalog, self.sink);
            let modifications = engine.retrofit_all(
                snapshot
                    .files
                    .iter_mut()
                    .enumerate()
                    .filter(|(idx, _)| project.contains(idx))
                    .map(|(_, file)| file),
                pass,
            );

            let files_written = if modifications.is_empty() {
                0
            } else {
                save_all(&mut snapshot.files)?
            };
            tracing::info!(
                target: "interfacer.driver",
                modifications = modifications.len(),
                files_written,
                "pass finished"
            );

            report.passes.push(PassSummary {
                pass,
                classes,
                interfaces: catalog.len(),
                modifications: modifications.len(),
                files_written,
            });
            report.parse_failures = snapshot.failures.len();
            state = if modifications.is_empty() {
                DriverState::Converged { passes: pass }
            } else {
                DriverState::Scanning { pass: pass + 1 }
            };
            report.modifications.extend(modifications);
        }

        if let DriverState::Converged { passes } = state {
            tracing::info!(target: "interfacer.driver", passes, total = report.modifications.len(), "converged");
        }
        Ok(report)
    }

    /// The interface catalog of the current sources, without modifying anything.
    pub fn catalog(&self) -> Result<InterfaceCatalog, RetrofitError> {
        self.options.validate()?;
        let snapshot = self.load()?;
        Ok(InterfaceCatalog::build(
            &snapshot,
            &self.options.interface_packages,
        ))
    }

    fn load(&self) -> Result<Snapshot, RetrofitError> {
        let snapshot = Snapshot::load(
            &self.options.scan_dir,
            self.options.interfaces_dir.as_deref(),
            &self.options.classpath,
        )?;

        for failure in &snapshot.failures {
            let problems: Vec<String> = failure.problems.iter().map(ToString::to_string).collect();
            self.sink.emit(Diagnostic::warning(
                "parse-failure",
                format!("skipping unparseable file: {}", problems.join("; ")),
                Some(failure.path.clone()),
            ));
        }
        for malformed in snapshot.classpath.malformed() {
            self.sink.emit(Diagnostic::warning(
                "malformed-classfile",
                format!("skipping malformed class file: {}", malformed.error),
                Some(PathBuf::from(&malformed.location)),
            ));
        }
        Ok(snapshot)
    }
}
