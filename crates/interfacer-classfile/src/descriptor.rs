use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn from_descriptor_char(ch: u8) -> Option<Self> {
        Some(match ch {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    /// The Java source keyword for this primitive.
    pub fn java_name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Base(BaseType),
    /// Internal (slash separated) class name.
    Object(String),
    Array(Box<FieldType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let mut pos = 0;
    let ty = field_type(desc, &mut pos)?;
    if pos != desc.len() {
        return Err(Error::descriptor(desc));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let invalid = || Error::descriptor(desc);
    let bytes = desc.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(invalid());
    }

    let mut pos = 1;
    let mut params = Vec::new();
    loop {
        match bytes.get(pos) {
            Some(b')') => {
                pos += 1;
                break;
            }
            Some(_) => params.push(field_type(desc, &mut pos)?),
            None => return Err(invalid()),
        }
    }

    let return_type = match bytes.get(pos) {
        Some(b'V') => {
            pos += 1;
            ReturnType::Void
        }
        Some(_) => ReturnType::Type(field_type(desc, &mut pos)?),
        None => return Err(invalid()),
    };

    if pos != desc.len() {
        return Err(invalid());
    }
    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn field_type(desc: &str, pos: &mut usize) -> Result<FieldType> {
    let bytes = desc.as_bytes();
    let Some(&ch) = bytes.get(*pos) else {
        return Err(Error::descriptor(desc));
    };
    *pos += 1;

    if let Some(base) = BaseType::from_descriptor_char(ch) {
        return Ok(FieldType::Base(base));
    }
    match ch {
        b'L' => {
            let start = *pos;
            let end = desc[start..]
                .find(';')
                .map(|rel| start + rel)
                .ok_or_else(|| Error::descriptor(desc))?;
            *pos = end + 1;
            Ok(FieldType::Object(desc[start..end].to_string()))
        }
        b'[' => Ok(FieldType::Array(Box::new(field_type(desc, pos)?))),
        _ => Err(Error::descriptor(desc)),
    }
}
