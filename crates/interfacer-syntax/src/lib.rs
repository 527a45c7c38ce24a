//! Java source store: tree-sitter based parsing into a small declaration model, and
//! formatting-preserving persistence of appended supertype clauses.

#![forbid(unsafe_code)]

pub mod edit;
mod java;
mod model;
mod store;

pub use crate::model::{
    BoundKind, Import, JavaFile, MethodDecl, ParseFailure, ParseOutcome, ParseProblem,
    SyntaxType, TypeDecl, TypeDeclKind, TypeParam,
};
pub use crate::store::{parse_file, parse_source, save_all, try_to_parse, SourceError};
