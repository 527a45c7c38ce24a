use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a classfile (or one of its descriptor strings) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("classfile truncated after {len} bytes")]
    Truncated { len: usize },
    #[error("{0} unread bytes after the class attributes")]
    TrailingBytes(usize),
    #[error("not a classfile: magic is 0x{0:08x}")]
    BadMagic(u32),
    #[error("unknown constant pool tag {0}")]
    UnknownConstantTag(u8),
    #[error("constant pool entry #{index}: {problem}")]
    Constant { index: u16, problem: ConstantProblem },
    #[error("constant pool string is not modified UTF-8")]
    ModifiedUtf8,
    #[error("malformed {notation} `{text}`")]
    Malformed { notation: Notation, text: String },
}

impl Error {
    pub(crate) fn descriptor(text: &str) -> Self {
        Error::Malformed {
            notation: Notation::Descriptor,
            text: text.to_string(),
        }
    }

    pub(crate) fn signature(text: &str) -> Self {
        Error::Malformed {
            notation: Notation::Signature,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantProblem {
    /// Out of range, slot zero, or the second slot of a `Long`/`Double`.
    Unusable,
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for ConstantProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantProblem::Unusable => f.write_str("no usable entry"),
            ConstantProblem::WrongKind { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Descriptor,
    Signature,
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Notation::Descriptor => "descriptor",
            Notation::Signature => "generic signature",
        })
    }
}
