use std::fs;
use std::io::Write;
use std::path::Path;

use interfacer_classfile::ClassWriter;
use interfacer_classpath::ClasspathEntry;
use interfacer_core::{CollectingSink, RetrofitOptions, Retrofitter};
use pretty_assertions::assert_eq;
use zip::write::FileOptions;

use super::workspace::Workspace;

fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, bytes) in entries {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn classfile_interfaces_are_retrofitted_like_source_ones() {
    let ws = Workspace::new();
    let jar = ws.root().join("api.jar");
    write_jar(
        &jar,
        &[
            (
                "com/example/api/HasName.class",
                ClassWriter::interface("com/example/api/HasName")
                    .abstract_method("getName", "()Ljava/lang/String;", None)
                    .to_bytes(),
            ),
            (
                "com/example/api/Source.class",
                ClassWriter::interface("com/example/api/Source")
                    .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
                    .abstract_method("next", "()Ljava/lang/Object;", Some("()TT;"))
                    .to_bytes(),
            ),
            ("com/example/api/Broken.class", vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00]),
        ],
    );
    ws.write(
        "src/app/Person.java",
        "package app;\n\npublic class Person {\n    public String getName() {\n        return \"p\";\n    }\n}\n",
    );
    ws.write(
        "src/app/Pet.java",
        "package app;\n\nimport com.example.api.HasName;\n\npublic class Pet {\n    public String getName() {\n        return \"rex\";\n    }\n}\n",
    );
    ws.write(
        "src/app/Names.java",
        "package app;\n\npublic class Names {\n    public String next() {\n        return \"n\";\n    }\n}\n",
    );

    let options = RetrofitOptions {
        scan_dir: ws.root().join("src"),
        interfaces_dir: None,
        interface_packages: vec!["com.example.api".into()],
        classpath: vec![ClasspathEntry::from_path(&jar)],
        max_passes: None,
    };
    let sink = CollectingSink::new();
    let report = Retrofitter::new(options, &sink).run().unwrap();

    assert_eq!(report.pass_counts(), vec![3, 0]);
    assert!(ws
        .read("src/app/Person.java")
        .contains("public class Person implements com.example.api.HasName {"));
    assert!(ws
        .read("src/app/Pet.java")
        .contains("public class Pet implements HasName {"));
    assert!(ws
        .read("src/app/Names.java")
        .contains("public class Names implements com.example.api.Source<String> {"));
    assert!(!sink.with_code("malformed-classfile").is_empty());
}
