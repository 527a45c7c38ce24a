use interfacer_classfile::{
    parse_class_signature, parse_method_descriptor, parse_method_signature, BaseType,
    ClassTypeSignature, FieldType, ReturnType, TypeArgument, TypeParameter, TypeSignature,
    ACC_ABSTRACT, ACC_ANNOTATION, ACC_ENUM, ACC_INTERFACE, ACC_PRIVATE, ACC_STATIC,
};
use interfacer_types::{
    ClassDef, ClassKind, MethodDef, PrimitiveType, TypeParamDef, TypeRef, WildcardBound,
};

use crate::{ClasspathClassStub, ClasspathMethodStub};

/// `java/util/Map$Entry` -> `java.util.Map.Entry`
pub fn internal_to_canonical(internal: &str) -> String {
    internal.replace(['/', '$'], ".")
}

/// Converts a classpath stub into the shared type model.
///
/// The generic `Signature` attribute is preferred; when it is missing or malformed the erased
/// descriptor is used instead.
pub fn to_class_def(stub: &ClasspathClassStub) -> ClassDef {
    let kind = if stub.access_flags & ACC_ANNOTATION != 0 {
        ClassKind::Annotation
    } else if stub.access_flags & ACC_INTERFACE != 0 {
        ClassKind::Interface
    } else if stub.access_flags & ACC_ENUM != 0 {
        ClassKind::Enum
    } else if stub.super_internal_name.as_deref() == Some("java/lang/Record") {
        ClassKind::Record
    } else {
        ClassKind::Class
    };

    let mut def = ClassDef::new(internal_to_canonical(&stub.internal_name), kind);

    match stub
        .signature
        .as_deref()
        .and_then(|sig| parse_class_signature(sig).ok())
    {
        Some(sig) => {
            def.type_params = sig.type_parameters.iter().map(type_param).collect();
            if kind != ClassKind::Interface && kind != ClassKind::Annotation {
                def.super_class = Some(class_type(&sig.super_class));
            }
            def.interfaces = sig.interfaces.iter().map(class_type).collect();
        }
        None => {
            if kind != ClassKind::Interface && kind != ClassKind::Annotation {
                def.super_class = stub
                    .super_internal_name
                    .as_deref()
                    .map(|name| TypeRef::raw(internal_to_canonical(name)));
            }
            def.interfaces = stub
                .interfaces
                .iter()
                .map(|name| TypeRef::raw(internal_to_canonical(name)))
                .collect();
        }
    }

    def.methods = stub
        .methods
        .iter()
        .filter(|m| m.name != "<init>" && m.name != "<clinit>")
        .filter_map(method_def)
        .collect();
    def
}

fn method_def(stub: &ClasspathMethodStub) -> Option<MethodDef> {
    let (type_params, params, return_type) = match stub
        .signature
        .as_deref()
        .and_then(|sig| parse_method_signature(sig).ok())
    {
        Some(sig) => (
            sig.type_parameters.iter().map(type_param).collect(),
            sig.parameters.iter().map(type_signature).collect(),
            sig.return_type
                .as_ref()
                .map(type_signature)
                .unwrap_or(TypeRef::Void),
        ),
        None => {
            let desc = parse_method_descriptor(&stub.descriptor)
                .map_err(|err| {
                    tracing::debug!(target: "interfacer.classpath", method = %stub.name, %err, "unparseable method descriptor");
                })
                .ok()?;
            let return_type = match &desc.return_type {
                ReturnType::Void => TypeRef::Void,
                ReturnType::Type(ty) => field_type(ty),
            };
            (Vec::new(), desc.params.iter().map(field_type).collect(), return_type)
        }
    };

    Some(MethodDef {
        name: stub.name.clone(),
        type_params,
        params,
        return_type,
        is_static: stub.access_flags & ACC_STATIC != 0,
        is_private: stub.access_flags & ACC_PRIVATE != 0,
        is_abstract: stub.access_flags & ACC_ABSTRACT != 0,
    })
}

fn type_param(tp: &TypeParameter) -> TypeParamDef {
    let mut upper_bounds: Vec<TypeRef> = tp.class_bound.iter().map(type_signature).collect();
    upper_bounds.extend(tp.interface_bounds.iter().map(type_signature));
    TypeParamDef {
        name: tp.name.clone(),
        upper_bounds,
    }
}

fn primitive(base: BaseType) -> PrimitiveType {
    match base {
        BaseType::Byte => PrimitiveType::Byte,
        BaseType::Char => PrimitiveType::Char,
        BaseType::Double => PrimitiveType::Double,
        BaseType::Float => PrimitiveType::Float,
        BaseType::Int => PrimitiveType::Int,
        BaseType::Long => PrimitiveType::Long,
        BaseType::Short => PrimitiveType::Short,
        BaseType::Boolean => PrimitiveType::Boolean,
    }
}

fn field_type(ty: &FieldType) -> TypeRef {
    match ty {
        FieldType::Base(base) => TypeRef::Primitive(primitive(*base)),
        FieldType::Object(internal) => TypeRef::raw(internal_to_canonical(internal)),
        FieldType::Array(elem) => TypeRef::array(field_type(elem)),
    }
}

fn type_signature(sig: &TypeSignature) -> TypeRef {
    match sig {
        TypeSignature::Base(base) => TypeRef::Primitive(primitive(*base)),
        TypeSignature::Class(class) => class_type(class),
        TypeSignature::TypeVariable(name) => TypeRef::TypeVar(name.clone()),
        TypeSignature::Array(elem) => TypeRef::array(type_signature(elem)),
    }
}

// Type arguments of outer segments (`Outer<A>.Inner<B>`) are dropped; only the innermost
// class carries arguments in `TypeRef`.
fn class_type(sig: &ClassTypeSignature) -> TypeRef {
    let args = sig
        .segments
        .last()
        .map(|seg| seg.type_arguments.iter().map(type_argument).collect())
        .unwrap_or_default();
    TypeRef::class(internal_to_canonical(&sig.internal_name()), args)
}

fn type_argument(arg: &TypeArgument) -> TypeRef {
    match arg {
        TypeArgument::Any => TypeRef::Wildcard(WildcardBound::Unbounded),
        TypeArgument::Exact(ty) => type_signature(ty),
        TypeArgument::Extends(ty) => {
            TypeRef::Wildcard(WildcardBound::Extends(Box::new(type_signature(ty))))
        }
        TypeArgument::Super(ty) => {
            TypeRef::Wildcard(WildcardBound::Super(Box::new(type_signature(ty))))
        }
    }
}
