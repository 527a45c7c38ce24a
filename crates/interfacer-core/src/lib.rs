//! Structural interface retrofitting.
//!
//! Each pass builds a [`Snapshot`] of the classpath and sources, derives an
//! [`InterfaceCatalog`], matches every top-level class against every interface with the
//! [`StructuralMatcher`], and appends the accepted, non-redundant interfaces to the classes'
//! implemented-type clauses. [`Retrofitter`] repeats passes until one changes nothing.

#![forbid(unsafe_code)]

mod catalog;
mod diagnostics;
mod driver;
mod error;
mod matcher;
mod project;
mod redundancy;
mod resolve;
mod retrofit;

pub use crate::catalog::{describe, InterfaceCatalog};
pub use crate::diagnostics::{CollectingSink, DiagnosticSink, TracingSink};
pub use crate::driver::{DriverState, PassSummary, RetrofitOptions, RetrofitReport, Retrofitter};
pub use crate::error::RetrofitError;
pub use crate::matcher::StructuralMatcher;
pub use crate::project::Snapshot;
pub use crate::redundancy::{is_covered_by, is_redundant, names_interface};
pub use crate::resolve::{DeclContext, FileScope};
pub use crate::retrofit::{Modification, RetrofitEngine};
