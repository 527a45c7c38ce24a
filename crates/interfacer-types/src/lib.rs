//! Type model shared by the interfacer crates.
//!
//! Classfile- and source-derived declarations are normalised into [`ClassDef`]s inside a
//! [`TypeStore`]; everything above this crate (catalog, matcher, redundancy filter) talks to
//! the store through the [`TypeOracle`] trait.

#![forbid(unsafe_code)]

mod descriptor;
mod diagnostic;
mod jdk;
mod oracle;
mod store;
mod ty;

pub use crate::descriptor::{
    BindingConflict, InterfaceDescriptor, InterfaceOrigin, MethodSignature, TypeVariableBinding,
};
pub use crate::diagnostic::{Diagnostic, Severity};
pub use crate::jdk::is_object_method;
pub use crate::oracle::{OracleError, TypeOracle};
pub use crate::store::{ClassDef, ClassKind, MethodDef, TypeParamDef, TypeStore};
pub use crate::ty::{PrimitiveType, Substitution, TypeRef, WildcardBound};

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
