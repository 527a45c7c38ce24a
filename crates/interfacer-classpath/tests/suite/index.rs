use std::fs;
use std::io::Write;
use std::path::Path;

use interfacer_classfile::{ClassWriter, ACC_ABSTRACT, ACC_ANNOTATION, ACC_INTERFACE, ACC_PUBLIC};
use interfacer_classpath::{to_class_def, ClasspathEntry, ClasspathIndex};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use zip::write::FileOptions;

fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, bytes) in entries {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

fn named_interface(internal: &str) -> Vec<u8> {
    ClassWriter::interface(internal)
        .abstract_method("getName", "()Ljava/lang/String;", None)
        .to_bytes()
}

#[test]
fn indexes_class_directories_and_filters_interfaces_by_package() {
    let tmp = TempDir::new().unwrap();
    let classes = tmp.path().join("classes");
    fs::create_dir_all(classes.join("com/example/api/v2")).unwrap();
    fs::create_dir_all(classes.join("com/examples")).unwrap();

    fs::write(
        classes.join("com/example/api/HasName.class"),
        named_interface("com/example/api/HasName"),
    )
    .unwrap();
    fs::write(
        classes.join("com/example/api/v2/HasId.class"),
        ClassWriter::interface("com/example/api/v2/HasId")
            .abstract_method("getId", "()J", None)
            .to_bytes(),
    )
    .unwrap();
    fs::write(
        classes.join("com/example/api/Marker.class"),
        ClassWriter::interface("com/example/api/Marker")
            .access_flags(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION)
            .to_bytes(),
    )
    .unwrap();
    fs::write(
        classes.join("com/example/api/Impl.class"),
        ClassWriter::class("com/example/api/Impl").to_bytes(),
    )
    .unwrap();
    fs::write(
        classes.join("com/examples/Other.class"),
        named_interface("com/examples/Other"),
    )
    .unwrap();
    fs::write(classes.join("com/example/api/Broken.class"), b"not a class").unwrap();

    let index = ClasspathIndex::build(&[ClasspathEntry::ClassDir(classes)]).unwrap();
    assert_eq!(index.len(), 5);
    assert_eq!(index.malformed().len(), 1);
    assert!(index.malformed()[0].location.ends_with("Broken.class"));

    let names: Vec<_> = index
        .interfaces_in_packages(&["com.example".to_string()])
        .into_iter()
        .map(|stub| stub.binary_name.as_str())
        .collect();
    assert_eq!(names, vec!["com.example.api.HasName", "com.example.api.v2.HasId"]);
}

#[test]
fn first_entry_wins_and_missing_entries_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let one = tmp.path().join("one.jar");
    let two = tmp.path().join("two.jar");
    write_jar(
        &one,
        &[(
            "p/Dupe.class",
            ClassWriter::interface("p/Dupe")
                .abstract_method("fromOne", "()V", None)
                .to_bytes(),
        )],
    );
    write_jar(
        &two,
        &[(
            "p/Dupe.class",
            ClassWriter::interface("p/Dupe")
                .abstract_method("fromTwo", "()V", None)
                .to_bytes(),
        )],
    );

    let index = ClasspathIndex::build(&[
        ClasspathEntry::Jar(tmp.path().join("missing.jar")),
        ClasspathEntry::from_path(&one),
        ClasspathEntry::from_path(&two),
    ])
    .unwrap();

    let def = to_class_def(index.lookup_binary("p.Dupe").unwrap());
    assert_eq!(def.methods[0].name, "fromOne");
}

#[test]
fn multi_release_jar_prefers_base_then_highest_version() {
    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("mr.jar");
    let versioned = |method: &str, internal: &str| {
        ClassWriter::interface(internal)
            .abstract_method(method, "()V", None)
            .to_bytes()
    };
    write_jar(
        &jar,
        &[
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\nMulti-Release: true\r\n".to_vec()),
            ("p/Base.class", versioned("base", "p/Base")),
            ("META-INF/versions/11/p/Base.class", versioned("v11", "p/Base")),
            ("META-INF/versions/9/p/Only.class", versioned("v9", "p/Only")),
            ("META-INF/versions/17/p/Only.class", versioned("v17", "p/Only")),
        ],
    );

    let index = ClasspathIndex::build(&[ClasspathEntry::Jar(jar)]).unwrap();
    assert_eq!(index.lookup_binary("p.Base").unwrap().methods[0].name, "base");
    assert_eq!(index.lookup_binary("p.Only").unwrap().methods[0].name, "v17");
}

#[test]
fn versions_directory_is_ignored_without_multi_release_manifest() {
    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("plain.jar");
    write_jar(
        &jar,
        &[(
            "META-INF/versions/9/p/Hidden.class",
            named_interface("p/Hidden"),
        )],
    );

    let index = ClasspathIndex::build(&[ClasspathEntry::Jar(jar)]).unwrap();
    assert!(index.is_empty());
}

#[test]
fn unreadable_jar_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let jar = tmp.path().join("corrupt.jar");
    fs::write(&jar, b"definitely not a zip").unwrap();

    let err = ClasspathIndex::build(&[ClasspathEntry::Jar(jar)]).unwrap_err();
    assert!(err.to_string().contains("corrupt.jar"), "{err}");
}
