use std::cell::RefCell;
use std::path::PathBuf;

use tree_sitter::{Node, Parser, Tree};

use crate::model::{
    BoundKind, ClauseAnchor, Import, JavaFile, MethodDecl, ParseProblem, SyntaxType, TypeDecl,
    TypeDeclKind, TypeParam,
};

thread_local! {
    static JAVA_PARSER: RefCell<Result<Parser, String>> = RefCell::new({
        let mut parser = Parser::new();
        match parser.set_language(tree_sitter_java::language()) {
            Ok(()) => Ok(parser),
            Err(_) => Err("tree-sitter-java language load failed".to_string()),
        }
    });
}

/// Parse Java source text with `tree-sitter-java`.
pub(crate) fn parse_java(source: &str) -> Result<Tree, String> {
    JAVA_PARSER.with(|parser_cell| {
        let mut parser = parser_cell
            .try_borrow_mut()
            .map_err(|_| "tree-sitter parser is already in use".to_string())?;
        let parser = match parser.as_mut() {
            Ok(parser) => parser,
            Err(err) => return Err(err.clone()),
        };

        parser
            .parse(source, None)
            .ok_or_else(|| "tree-sitter failed to produce a syntax tree".to_string())
    })
}

fn node_text<'a>(source: &'a str, node: Node<'_>) -> &'a str {
    &source[node.byte_range()]
}

fn find_named_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let result = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == kind);
    result
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node.named_children(&mut cursor).collect();
    children
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == token);
    found
}

fn is_annotation(node: Node<'_>) -> bool {
    matches!(node.kind(), "annotation" | "marker_annotation")
}

/// Dotted name with all whitespace and comments between segments removed.
fn compact_name(source: &str, node: Node<'_>) -> String {
    node_text(source, node)
        .split('.')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(".")
}

/// Error and missing nodes, outermost only.
pub(crate) fn collect_problems(root: Node<'_>, source: &str) -> Vec<ParseProblem> {
    fn walk(node: Node<'_>, source: &str, out: &mut Vec<ParseProblem>) {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                let snippet: String = node_text(source, node).chars().take(40).collect();
                format!("unexpected `{}`", snippet.trim())
            };
            out.push(ParseProblem {
                line: pos.row + 1,
                column: pos.column + 1,
                message,
            });
            return;
        }
        if !node.has_error() {
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            walk(child, source, out);
        }
    }

    let mut out = Vec::new();
    walk(root, source, &mut out);
    if out.is_empty() && root.has_error() {
        out.push(ParseProblem {
            line: 1,
            column: 1,
            message: "syntax error".to_string(),
        });
    }
    out
}

pub(crate) fn extract_file(path: PathBuf, text: String, root: Node<'_>) -> JavaFile {
    let source = text.as_str();
    let mut package = None;
    let mut imports = Vec::new();
    let mut types = Vec::new();

    for child in named_children(root) {
        match child.kind() {
            "package_declaration" => {
                package = named_children(child)
                    .into_iter()
                    .find(|n| matches!(n.kind(), "scoped_identifier" | "identifier"))
                    .map(|n| compact_name(source, n));
            }
            "import_declaration" => {
                let name = named_children(child)
                    .into_iter()
                    .find(|n| matches!(n.kind(), "scoped_identifier" | "identifier"));
                if let Some(name) = name {
                    imports.push(Import {
                        path: compact_name(source, name),
                        is_static: has_token(child, "static"),
                        on_demand: find_named_child(child, "asterisk").is_some(),
                    });
                }
            }
            _ => {
                if let Some(decl) = type_decl(child, source) {
                    types.push(decl);
                }
            }
        }
    }

    JavaFile {
        path,
        text,
        package,
        imports,
        types,
    }
}

fn type_decl(node: Node<'_>, source: &str) -> Option<TypeDecl> {
    let kind = match node.kind() {
        "class_declaration" => TypeDeclKind::Class,
        "interface_declaration" => TypeDeclKind::Interface,
        "enum_declaration" => TypeDeclKind::Enum,
        "record_declaration" => TypeDeclKind::Record,
        "annotation_type_declaration" => TypeDeclKind::Annotation,
        _ => return None,
    };
    let name_node = node.child_by_field_name("name")?;
    let type_params_node = node.child_by_field_name("type_parameters");
    let superclass_node = node.child_by_field_name("superclass");

    let clause_node = match kind {
        TypeDeclKind::Interface => find_named_child(node, "extends_interfaces"),
        TypeDeclKind::Annotation => None,
        _ => node
            .child_by_field_name("interfaces")
            .or_else(|| find_named_child(node, "super_interfaces")),
    };

    let interfaces: Vec<SyntaxType> = clause_node
        .and_then(|clause| find_named_child(clause, "type_list"))
        .map(|list| {
            named_children(list)
                .into_iter()
                .filter(|n| !is_annotation(*n))
                .map(|n| syntax_type(n, source))
                .collect()
        })
        .unwrap_or_default();

    let anchor = match clause_node {
        Some(clause) => ClauseAnchor {
            offset: clause.end_byte(),
            has_clause: true,
        },
        None => {
            let after = superclass_node
                .or_else(|| node.child_by_field_name("parameters"))
                .or(type_params_node)
                .unwrap_or(name_node);
            ClauseAnchor {
                offset: after.end_byte(),
                has_clause: false,
            }
        }
    };

    let mut methods = Vec::new();
    let mut members = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        collect_body(body, source, kind, &mut methods, &mut members);
    }

    Some(TypeDecl {
        kind,
        name: node_text(source, name_node).to_string(),
        type_params: type_params_node
            .map(|n| type_params(n, source))
            .unwrap_or_default(),
        superclass: superclass_node.and_then(|n| first_type_child(n).map(|t| syntax_type(t, source))),
        declared_interfaces: interfaces.len(),
        interfaces,
        methods,
        members,
        anchor,
    })
}

fn collect_body(
    body: Node<'_>,
    source: &str,
    owner: TypeDeclKind,
    methods: &mut Vec<MethodDecl>,
    members: &mut Vec<TypeDecl>,
) {
    for child in named_children(body) {
        match child.kind() {
            "method_declaration" => {
                if let Some(method) = method_decl(child, source, owner) {
                    methods.push(method);
                }
            }
            // Enum constants are followed by an ordinary member list.
            "enum_body_declarations" => collect_body(child, source, owner, methods, members),
            _ => {
                if let Some(member) = type_decl(child, source) {
                    members.push(member);
                }
            }
        }
    }
}

fn method_decl(node: Node<'_>, source: &str, owner: TypeDeclKind) -> Option<MethodDecl> {
    let name = node_text(source, node.child_by_field_name("name")?).to_string();
    let modifiers = find_named_child(node, "modifiers");
    let has_modifier = |m: &str| modifiers.is_some_and(|mods| has_token(mods, m));

    let is_static = has_modifier("static");
    let is_private = has_modifier("private");
    let is_default = has_modifier("default");
    let has_body = node.child_by_field_name("body").is_some();
    let is_abstract = match owner {
        TypeDeclKind::Interface | TypeDeclKind::Annotation => !has_body,
        _ => has_modifier("abstract"),
    };

    let mut return_type = node
        .child_by_field_name("type")
        .map(|n| syntax_type(n, source))
        .unwrap_or_else(|| SyntaxType::Unknown(String::new()));
    // Legacy `int values()[]` form.
    if let Some(dims) = node.child_by_field_name("dimensions") {
        return_type = wrap_dimensions(return_type, source, dims);
    }

    let params = node
        .child_by_field_name("parameters")
        .map(|n| formal_parameters(n, source))
        .unwrap_or_default();

    Some(MethodDecl {
        name,
        type_params: node
            .child_by_field_name("type_parameters")
            .map(|n| type_params(n, source))
            .unwrap_or_default(),
        params,
        return_type,
        is_static,
        is_private,
        is_abstract,
        is_default,
    })
}

fn formal_parameters(node: Node<'_>, source: &str) -> Vec<SyntaxType> {
    let mut out = Vec::new();
    for param in named_children(node) {
        match param.kind() {
            "formal_parameter" => {
                let Some(ty) = param.child_by_field_name("type") else {
                    continue;
                };
                let mut ty = syntax_type(ty, source);
                if let Some(dims) = param.child_by_field_name("dimensions") {
                    ty = wrap_dimensions(ty, source, dims);
                }
                out.push(ty);
            }
            "spread_parameter" => {
                let ty = named_children(param)
                    .into_iter()
                    .find(|n| !matches!(n.kind(), "modifiers" | "variable_declarator") && !is_annotation(*n));
                if let Some(ty) = ty {
                    out.push(SyntaxType::Array(Box::new(syntax_type(ty, source))));
                }
            }
            _ => {}
        }
    }
    out
}

fn type_params(node: Node<'_>, source: &str) -> Vec<TypeParam> {
    named_children(node)
        .into_iter()
        .filter(|n| n.kind() == "type_parameter")
        .filter_map(|tp| {
            let children = named_children(tp);
            let name = children
                .iter()
                .find(|n| matches!(n.kind(), "type_identifier" | "identifier"))?;
            let bounds = children
                .iter()
                .find(|n| n.kind() == "type_bound")
                .map(|bound| {
                    named_children(*bound)
                        .into_iter()
                        .filter(|n| !is_annotation(*n))
                        .map(|n| syntax_type(n, source))
                        .collect()
                })
                .unwrap_or_default();
            Some(TypeParam {
                name: node_text(source, *name).to_string(),
                bounds,
            })
        })
        .collect()
}

fn first_type_child(node: Node<'_>) -> Option<Node<'_>> {
    named_children(node).into_iter().find(|n| !is_annotation(*n))
}

fn wrap_dimensions(mut ty: SyntaxType, source: &str, dims: Node<'_>) -> SyntaxType {
    let count = node_text(source, dims).matches('[').count();
    for _ in 0..count {
        ty = SyntaxType::Array(Box::new(ty));
    }
    ty
}

/// Dotted name of a (possibly scoped, possibly generic) type, without type arguments.
fn type_name(node: Node<'_>, source: &str) -> String {
    match node.kind() {
        "scoped_type_identifier" => {
            let children: Vec<Node<'_>> = named_children(node)
                .into_iter()
                .filter(|n| !is_annotation(*n))
                .collect();
            match children.as_slice() {
                [qualifier, .., last] => {
                    format!("{}.{}", type_name(*qualifier, source), node_text(source, *last))
                }
                _ => compact_name(source, node),
            }
        }
        "generic_type" => named_children(node)
            .first()
            .map(|n| type_name(*n, source))
            .unwrap_or_default(),
        _ => compact_name(source, node),
    }
}

pub(crate) fn syntax_type(node: Node<'_>, source: &str) -> SyntaxType {
    match node.kind() {
        "void_type" => SyntaxType::Void,
        "integral_type" | "floating_point_type" | "boolean_type" => {
            SyntaxType::Primitive(node_text(source, node).trim().to_string())
        }
        "type_identifier" | "scoped_type_identifier" => SyntaxType::Named {
            name: type_name(node, source),
            args: Vec::new(),
        },
        "generic_type" => {
            let args = find_named_child(node, "type_arguments")
                .map(|args| {
                    named_children(args)
                        .into_iter()
                        .filter(|n| !is_annotation(*n))
                        .map(|n| syntax_type(n, source))
                        .collect()
                })
                .unwrap_or_default();
            SyntaxType::Named {
                name: type_name(node, source),
                args,
            }
        }
        "array_type" => {
            let elem = node
                .child_by_field_name("element")
                .map(|n| syntax_type(n, source))
                .unwrap_or_else(|| SyntaxType::Unknown(node_text(source, node).to_string()));
            match node.child_by_field_name("dimensions") {
                Some(dims) => wrap_dimensions(elem, source, dims),
                None => SyntaxType::Array(Box::new(elem)),
            }
        }
        "wildcard" => {
            let kind = if has_token(node, "super") {
                BoundKind::Super
            } else {
                BoundKind::Extends
            };
            let bound = named_children(node)
                .into_iter()
                .rev()
                .find(|n| n.kind() != "super" && !is_annotation(*n));
            SyntaxType::Wildcard(bound.map(|b| (kind, Box::new(syntax_type(b, source)))))
        }
        "annotated_type" => named_children(node)
            .into_iter()
            .rev()
            .find(|n| !is_annotation(*n))
            .map(|n| syntax_type(n, source))
            .unwrap_or_else(|| SyntaxType::Unknown(node_text(source, node).to_string())),
        _ => SyntaxType::Unknown(node_text(source, node).trim().to_string()),
    }
}
