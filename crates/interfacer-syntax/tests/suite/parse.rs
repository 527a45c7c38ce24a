use std::path::PathBuf;

use interfacer_syntax::{parse_source, ParseOutcome, SyntaxType, TypeDeclKind};
use pretty_assertions::assert_eq;

fn parse(text: &str) -> ParseOutcome {
    parse_source(PathBuf::from("Test.java"), text.to_string()).unwrap()
}

const SAMPLE: &str = r#"
package com.example.model;

import java.util.List;
import java.util.*;
import static java.util.Collections.emptyList;

public class Sample<T extends Comparable<T>> extends Base<String> implements Serializable, HasId {
    private List<? extends Number> values;

    public Sample() {}

    public String getName() { return null; }

    public static Sample of(int... xs) { return null; }

    public List<Map.Entry<String, T>> entries(java.util.Map<String, int[]> m, String args[]) {
        return null;
    }

    private void hidden() {}

    public interface Inner {
        void run();
    }
}
"#;

#[test]
fn extracts_package_imports_and_class_header() {
    let file = parse(SAMPLE).into_file().expect("sample parses");
    assert_eq!(file.package.as_deref(), Some("com.example.model"));
    assert_eq!(file.qualified_name("Sample"), "com.example.model.Sample");

    let imports: Vec<_> = file
        .imports
        .iter()
        .map(|i| (i.path.as_str(), i.is_static, i.on_demand))
        .collect();
    assert_eq!(
        imports,
        vec![
            ("java.util.List", false, false),
            ("java.util", false, true),
            ("java.util.Collections.emptyList", true, false),
        ]
    );

    let sample = &file.types[0];
    assert_eq!(sample.kind, TypeDeclKind::Class);
    assert_eq!(sample.name, "Sample");
    assert_eq!(sample.type_params[0].name, "T");
    assert_eq!(sample.type_params[0].bounds[0].to_string(), "Comparable<T>");
    assert_eq!(
        sample.superclass,
        Some(SyntaxType::named(
            "Base",
            vec![SyntaxType::named("String", vec![])]
        ))
    );
    let interfaces: Vec<_> = sample.interfaces.iter().map(ToString::to_string).collect();
    assert_eq!(interfaces, vec!["Serializable", "HasId"]);
    assert!(sample.added_interfaces().is_empty());
}

#[test]
fn extracts_methods_with_varargs_and_legacy_arrays() {
    let file = parse(SAMPLE).into_file().unwrap();
    let sample = &file.types[0];

    let names: Vec<_> = sample.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["getName", "of", "entries", "hidden"]);

    let of = &sample.methods[1];
    assert!(of.is_static);
    assert_eq!(of.params[0].to_string(), "int[]");

    let entries = &sample.methods[2];
    assert_eq!(entries.return_type.to_string(), "List<Map.Entry<String, T>>");
    let params: Vec<_> = entries.params.iter().map(ToString::to_string).collect();
    assert_eq!(params, vec!["java.util.Map<String, int[]>", "String[]"]);

    assert!(sample.methods[3].is_private);
    assert_eq!(sample.methods[3].return_type, SyntaxType::Void);

    let inner = &sample.members[0];
    assert_eq!(inner.kind, TypeDeclKind::Interface);
    assert!(inner.methods[0].is_abstract);
}

#[test]
fn interface_method_flags() {
    let file = parse(
        r#"
        package p;
        public interface GenericInterface<E> extends Base<E> {
            E getSingleton();
            default int size() { return 0; }
            static void util() {}
            java.util.List<? super E> getList();
        }
        "#,
    )
    .into_file()
    .unwrap();

    let iface = &file.types[0];
    assert_eq!(iface.kind, TypeDeclKind::Interface);
    assert_eq!(iface.interfaces[0].to_string(), "Base<E>");

    let flags: Vec<_> = iface
        .methods
        .iter()
        .map(|m| (m.name.as_str(), m.is_abstract, m.is_default, m.is_static))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("getSingleton", true, false, false),
            ("size", false, true, false),
            ("util", false, false, true),
            ("getList", true, false, false),
        ]
    );
    assert_eq!(
        iface.methods[3].return_type.to_string(),
        "java.util.List<? super E>"
    );
}

#[test]
fn syntax_errors_are_reported_with_positions() {
    let ParseOutcome::Failed(failure) = parse("public class Broken {\n    void x( \n}\n") else {
        panic!("expected a parse failure");
    };
    assert_eq!(failure.path, PathBuf::from("Test.java"));
    assert!(!failure.problems.is_empty());
    assert!(failure.problems.iter().all(|p| p.line >= 1 && p.column >= 1));
}
