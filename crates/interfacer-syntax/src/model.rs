use std::fmt;
use std::path::PathBuf;

/// A type as written in source. Names are kept exactly as spelled (simple, partially or fully
/// qualified); resolving them is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxType {
    Void,
    /// Primitive keyword, e.g. `int`.
    Primitive(String),
    /// `Map.Entry<K, V>`: the dotted name without type arguments, plus the arguments of the
    /// innermost segment.
    Named { name: String, args: Vec<SyntaxType> },
    Array(Box<SyntaxType>),
    Wildcard(Option<(BoundKind, Box<SyntaxType>)>),
    /// Anything the extractor does not model, kept verbatim.
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Extends,
    Super,
}

impl SyntaxType {
    pub fn named(name: impl Into<String>, args: Vec<SyntaxType>) -> Self {
        SyntaxType::Named {
            name: name.into(),
            args,
        }
    }

    /// The written name of a class type, without type arguments.
    pub fn name(&self) -> Option<&str> {
        match self {
            SyntaxType::Named { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for SyntaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxType::Void => f.write_str("void"),
            SyntaxType::Primitive(keyword) => f.write_str(keyword),
            SyntaxType::Named { name, args } => {
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
            SyntaxType::Array(elem) => write!(f, "{elem}[]"),
            SyntaxType::Wildcard(None) => f.write_str("?"),
            SyntaxType::Wildcard(Some((BoundKind::Extends, bound))) => {
                write!(f, "? extends {bound}")
            }
            SyntaxType::Wildcard(Some((BoundKind::Super, bound))) => write!(f, "? super {bound}"),
            SyntaxType::Unknown(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Dotted path without the trailing `.*`.
    pub path: String,
    pub is_static: bool,
    pub on_demand: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<SyntaxType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<SyntaxType>,
    pub return_type: SyntaxType,
    pub is_static: bool,
    pub is_private: bool,
    pub is_abstract: bool,
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeDeclKind {
    /// Keyword introducing the list `interfaces` is written into.
    fn clause_keyword(self) -> &'static str {
        match self {
            TypeDeclKind::Interface => "extends",
            _ => "implements",
        }
    }
}

/// Where new supertype clauses are spliced into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClauseAnchor {
    /// Byte offset just past the existing clause list, or past the header element the new
    /// clause has to follow.
    pub(crate) offset: usize,
    pub(crate) has_clause: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<SyntaxType>,
    /// `implements` list of classes, enums and records; `extends` list of interfaces.
    ///
    /// Appending to this list is the only supported mutation; [`crate::save_all`] writes the
    /// appended entries back to disk.
    pub interfaces: Vec<SyntaxType>,
    pub methods: Vec<MethodDecl>,
    pub members: Vec<TypeDecl>,
    pub(crate) declared_interfaces: usize,
    pub(crate) anchor: ClauseAnchor,
}

impl TypeDecl {
    /// Entries appended to `interfaces` since the declaration was parsed.
    pub fn added_interfaces(&self) -> &[SyntaxType] {
        self.interfaces.get(self.declared_interfaces..).unwrap_or(&[])
    }

    pub fn is_modified(&self) -> bool {
        !self.added_interfaces().is_empty() || self.members.iter().any(TypeDecl::is_modified)
    }

    /// Source text to insert at the anchor for the appended clauses, if any.
    pub(crate) fn clause_insertion(&self) -> Option<(usize, String)> {
        let added = self.added_interfaces();
        if added.is_empty() {
            return None;
        }
        let list = added
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let text = if self.anchor.has_clause {
            format!(", {list}")
        } else {
            format!(" {} {list}", self.kind.clause_keyword())
        };
        Some((self.anchor.offset, text))
    }
}

/// One parsed compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaFile {
    pub path: PathBuf,
    pub text: String,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub types: Vec<TypeDecl>,
}

impl JavaFile {
    pub fn package_name(&self) -> &str {
        self.package.as_deref().unwrap_or("")
    }

    /// Dotted name of a top-level type declared in this file.
    pub fn qualified_name(&self, simple_name: &str) -> String {
        match self.package.as_deref() {
            Some(pkg) if !pkg.is_empty() => format!("{pkg}.{simple_name}"),
            _ => simple_name.to_string(),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.types.iter().any(TypeDecl::is_modified)
    }
}

/// A syntax error reported by the parser (1-based line and column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProblem {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for ParseProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub problems: Vec<ParseProblem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(JavaFile),
    Failed(ParseFailure),
}

impl ParseOutcome {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ParseOutcome::Parsed(file) => &file.path,
            ParseOutcome::Failed(failure) => &failure.path,
        }
    }

    pub fn into_file(self) -> Option<JavaFile> {
        match self {
            ParseOutcome::Parsed(file) => Some(file),
            ParseOutcome::Failed(_) => None,
        }
    }
}
