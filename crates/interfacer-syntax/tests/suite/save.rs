use std::fs;
use std::path::Path;

use interfacer_syntax::{save_all, try_to_parse, JavaFile, ParseOutcome, SyntaxType};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn load(dir: &Path) -> Vec<JavaFile> {
    try_to_parse(dir)
        .unwrap()
        .into_iter()
        .filter_map(ParseOutcome::into_file)
        .collect()
}

fn retrofit_single(source: &str, clause: SyntaxType) -> String {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("Sample.java");
    fs::write(&path, source).unwrap();

    let mut files = load(tmp.path());
    files[0].types[0].interfaces.push(clause);
    assert_eq!(save_all(&mut files).unwrap(), 1);
    assert!(!files[0].is_modified());
    fs::read_to_string(&path).unwrap()
}

#[test]
fn adds_implements_after_superclass() {
    let out = retrofit_single(
        "public class Sample extends Base {\n}\n",
        SyntaxType::named("HasName", vec![]),
    );
    assert_eq!(out, "public class Sample extends Base implements HasName {\n}\n");
}

#[test]
fn appends_to_existing_clause() {
    let out = retrofit_single(
        "public class Sample /* keep */ implements Existing {\n  int x;\n}\n",
        SyntaxType::named(
            "GenericInterface",
            vec![SyntaxType::named("String", vec![])],
        ),
    );
    assert_eq!(
        out,
        "public class Sample /* keep */ implements Existing, GenericInterface<String> {\n  int x;\n}\n"
    );
}

#[test]
fn adds_clause_after_type_parameters() {
    let out = retrofit_single(
        "class Box<T> {\n    T get() { return null; }\n}\n",
        SyntaxType::named("p.Supplier", vec![SyntaxType::named("T", vec![])]),
    );
    assert_eq!(
        out,
        "class Box<T> implements p.Supplier<T> {\n    T get() { return null; }\n}\n"
    );
}

#[test]
fn nested_declarations_can_be_edited() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("Outer.java");
    fs::write(&path, "class Outer {\n    static class Inner {}\n}\n").unwrap();

    let mut files = load(tmp.path());
    files[0].types[0].members[0]
        .interfaces
        .push(SyntaxType::named("I", vec![]));
    save_all(&mut files).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "class Outer {\n    static class Inner implements I {}\n}\n"
    );
}

#[test]
fn only_modified_files_are_written_and_failures_are_kept_apart() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("p")).unwrap();
    fs::write(tmp.path().join("p/A.java"), "package p;\nclass A {}\n").unwrap();
    fs::write(tmp.path().join("p/B.java"), "package p;\nclass B {}\n").unwrap();
    fs::write(tmp.path().join("p/Broken.java"), "package p;\nclass {\n").unwrap();
    fs::write(tmp.path().join("p/notes.txt"), "not java").unwrap();

    let outcomes = try_to_parse(tmp.path()).unwrap();
    let paths: Vec<_> = outcomes
        .iter()
        .map(|o| o.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(paths, vec!["A.java", "B.java", "Broken.java"]);
    assert!(matches!(outcomes[2], ParseOutcome::Failed(_)));

    let mut files: Vec<JavaFile> = outcomes
        .into_iter()
        .filter_map(ParseOutcome::into_file)
        .collect();
    files[1].types[0].interfaces.push(SyntaxType::named("I", vec![]));
    files[1].types[0].interfaces.push(SyntaxType::named("J", vec![]));

    assert_eq!(save_all(&mut files).unwrap(), 1);
    assert_eq!(
        fs::read_to_string(tmp.path().join("p/A.java")).unwrap(),
        "package p;\nclass A {}\n"
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("p/B.java")).unwrap(),
        "package p;\nclass B implements I, J {}\n"
    );
    assert_eq!(files[1].types[0].interfaces.len(), 2);
    assert!(files[1].types[0].added_interfaces().is_empty());
}

#[test]
fn missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(try_to_parse(&tmp.path().join("nope")).is_err());
}
