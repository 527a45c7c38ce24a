use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::JAVA_LANG_OBJECT;

/// Type variable name -> replacement.
pub type Substitution = BTreeMap<String, TypeRef>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn java_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_java_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.java_name() == name)
    }

    /// Fully qualified name of the wrapper class.
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    pub fn unboxed(class_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.boxed_name() == class_name)
    }

    /// Widening primitive conversion (JLS 5.1.2). Not reflexive.
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        use PrimitiveType::*;
        matches!(
            (self, target),
            (Byte, Short | Int | Long | Float | Double)
                | (Short, Int | Long | Float | Double)
                | (Char, Int | Long | Float | Double)
                | (Int, Long | Float | Double)
                | (Long, Float | Double)
                | (Float, Double)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<TypeRef>),
    Super(Box<TypeRef>),
}

/// A reference to a Java type, by canonical dotted name.
///
/// Nested types use `.` between the outer and inner simple names (`java.util.Map.Entry`), the
/// same spelling a Java source file would use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TypeRef {
    Void,
    Primitive(PrimitiveType),
    Class { name: String, args: Vec<TypeRef> },
    Array(Box<TypeRef>),
    TypeVar(String),
    Wildcard(WildcardBound),
}

impl TypeRef {
    pub fn class(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Class {
            name: name.into(),
            args,
        }
    }

    pub fn raw(name: impl Into<String>) -> Self {
        Self::class(name, Vec::new())
    }

    pub fn object() -> Self {
        Self::raw(JAVA_LANG_OBJECT)
    }

    pub fn array(elem: TypeRef) -> Self {
        TypeRef::Array(Box::new(elem))
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        self.class_name() == Some(JAVA_LANG_OBJECT)
    }

    /// Primitive and `void` types are compared textually by the matcher.
    pub fn is_primitive_or_void(&self) -> bool {
        matches!(self, TypeRef::Void | TypeRef::Primitive(_))
    }

    /// Boxes a primitive; every other type is returned unchanged.
    pub fn boxed(&self) -> TypeRef {
        match self {
            TypeRef::Primitive(p) => TypeRef::raw(p.boxed_name()),
            other => other.clone(),
        }
    }

    /// Drops type arguments, keeping the class/array structure.
    pub fn erasure(&self) -> TypeRef {
        match self {
            TypeRef::Class { name, .. } => TypeRef::raw(name.clone()),
            TypeRef::Array(elem) => TypeRef::array(elem.erasure()),
            other => other.clone(),
        }
    }

    pub fn mentions_type_var(&self, var: &str) -> bool {
        match self {
            TypeRef::TypeVar(name) => name == var,
            TypeRef::Class { args, .. } => args.iter().any(|arg| arg.mentions_type_var(var)),
            TypeRef::Array(elem) => elem.mentions_type_var(var),
            TypeRef::Wildcard(WildcardBound::Extends(b) | WildcardBound::Super(b)) => {
                b.mentions_type_var(var)
            }
            _ => false,
        }
    }

    /// Replaces every type variable found in `subst`; others are left in place.
    pub fn substitute(&self, subst: &Substitution) -> TypeRef {
        if subst.is_empty() {
            return self.clone();
        }
        match self {
            TypeRef::TypeVar(name) => subst.get(name).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Class { name, args } => TypeRef::Class {
                name: name.clone(),
                args: args.iter().map(|arg| arg.substitute(subst)).collect(),
            },
            TypeRef::Array(elem) => TypeRef::array(elem.substitute(subst)),
            TypeRef::Wildcard(WildcardBound::Extends(b)) => {
                TypeRef::Wildcard(WildcardBound::Extends(Box::new(b.substitute(subst))))
            }
            TypeRef::Wildcard(WildcardBound::Super(b)) => {
                TypeRef::Wildcard(WildcardBound::Super(Box::new(b.substitute(subst))))
            }
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Primitive(p) => f.write_str(p.java_name()),
            TypeRef::Class { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Array(elem) => write!(f, "{elem}[]"),
            TypeRef::TypeVar(name) => f.write_str(name),
            TypeRef::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            TypeRef::Wildcard(WildcardBound::Extends(b)) => write!(f, "? extends {b}"),
            TypeRef::Wildcard(WildcardBound::Super(b)) => write!(f, "? super {b}"),
        }
    }
}
