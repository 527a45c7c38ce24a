use std::fs;

use interfacer_classfile::ClassWriter;
use interfacer_classpath::ClasspathEntry;
use interfacer_core::{Retrofitter, TracingSink};
use interfacer_types::InterfaceOrigin;
use pretty_assertions::assert_eq;

use super::workspace::Workspace;

#[test]
fn source_catalog_collects_instance_methods_of_top_level_interfaces() {
    let ws = Workspace::new();
    ws.write(
        "api/p/Named.java",
        "package p;

public interface Named {
    String getName();

    default String display() {
        return getName();
    }

    static Named of(String name) {
        return () -> name;
    }

    boolean equals(Object other);

    String toString();
}
",
    );
    ws.write(
        "api/p/Sized.java",
        "package p;\n\npublic interface Sized extends Named {\n    int size();\n}\n",
    );
    ws.write("api/p/Tag.java", "package p;\n\npublic @interface Tag {\n}\n");
    ws.write("api/p/Helper.java", "package p;\n\nclass Helper {\n    String getName() { return \"\"; }\n}\n");

    let catalog = Retrofitter::new(ws.options(), &TracingSink).catalog().unwrap();

    let names: Vec<&str> = catalog.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["p.Sized", "p.Named"]);

    let sized = catalog.get("p.Sized").unwrap();
    let methods: Vec<&str> = sized.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["size", "getName", "display"]);
    assert_eq!(
        sized.origin,
        InterfaceOrigin::Source(ws.root().join("api/p/Sized.java"))
    );
}

#[test]
fn classpath_interfaces_come_first_when_names_collide() {
    let ws = Workspace::new();
    let classes = ws.root().join("classes");
    fs::create_dir_all(classes.join("p")).unwrap();
    fs::write(
        classes.join("p/Named.class"),
        ClassWriter::interface("p/Named")
            .abstract_method("getName", "()Ljava/lang/String;", None)
            .to_bytes(),
    )
    .unwrap();
    ws.write(
        "api/p/Named.java",
        "package p;\n\npublic interface Named {\n    String getName();\n}\n",
    );

    let options = interfacer_core::RetrofitOptions {
        interface_packages: vec!["p".into()],
        classpath: vec![ClasspathEntry::ClassDir(classes)],
        ..ws.options()
    };
    let catalog = Retrofitter::new(options, &TracingSink).catalog().unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get("p.Named").unwrap().origin, InterfaceOrigin::Classpath);
}
