//! Minimal JVM classfile reader.
//!
//! Only the parts needed to describe a type's API are decoded: the constant pool,
//! class/member headers and the `Signature` attribute. Everything else (code, annotations,
//! stack maps, ...) is skipped.

#![forbid(unsafe_code)]

mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod reader;
mod signature;
#[cfg(any(test, feature = "writer"))]
mod writer;

pub use crate::classfile::{
    ClassFile, ClassMember, ACC_ABSTRACT, ACC_ANNOTATION, ACC_BRIDGE, ACC_ENUM,
    ACC_INTERFACE, ACC_PRIVATE, ACC_PUBLIC, ACC_STATIC, ACC_SYNTHETIC,
};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{ConstantProblem, Error, Notation, Result};
pub use crate::signature::{
    parse_class_signature, parse_method_signature, ClassSignature, ClassTypeSignature,
    MethodSignature, SimpleClassTypeSignature, TypeArgument, TypeParameter, TypeSignature,
};
#[cfg(any(test, feature = "writer"))]
pub use crate::writer::ClassWriter;
