use interfacer_core::{CollectingSink, RetrofitError, RetrofitOptions, Retrofitter, TracingSink};
use pretty_assertions::assert_eq;

use super::workspace::Workspace;

const GENERIC_INTERFACE: &str = "package api;

import java.util.List;

public interface GenericInterface<E> {
    E getSingleton();

    List<E> getList();
}
";

fn cascade_workspace() -> Workspace {
    let ws = Workspace::new();
    ws.write(
        "api/sample/SampleInterface.java",
        "package sample;\n\npublic interface SampleInterface {\n    String getName();\n}\n",
    );
    ws.write(
        "api/sample/SampleInterface2.java",
        "package sample;\n\npublic interface SampleInterface2 {\n    SampleInterface getResult();\n}\n",
    );
    ws.write(
        "src/sample/SampleResult.java",
        "package sample;\n\npublic class SampleResult {\n    public String getName() {\n        return \"result\";\n    }\n}\n",
    );
    ws.write(
        "src/sample/Sample.java",
        "package sample;\n\npublic class Sample {\n    public SampleResult getResult() {\n        return new SampleResult();\n    }\n}\n",
    );
    ws
}

#[test]
fn generic_interface_is_parameterized_with_the_bound_type() {
    let ws = Workspace::new();
    ws.write("api/api/GenericInterface.java", GENERIC_INTERFACE);
    ws.write(
        "src/app/Impl.java",
        "package app;

import java.util.ArrayList;
import java.util.List;

public class Impl {
    public String getSingleton() {
        return \"x\";
    }

    public List<String> getList() {
        return new ArrayList<>();
    }
}
",
    );
    ws.write(
        "src/app/Mismatch.java",
        "package app;

import java.util.List;

public class Mismatch {
    public Integer getSingleton() {
        return 1;
    }

    public List<String> getList() {
        return null;
    }
}
",
    );
    ws.write(
        "src/app/Box.java",
        "package app;

import java.util.List;

public class Box<T> {
    public T getSingleton() {
        return null;
    }

    public List<T> getList() {
        return null;
    }
}
",
    );

    let sink = CollectingSink::new();
    let report = Retrofitter::new(ws.options(), &sink).run().unwrap();

    assert_eq!(report.pass_counts(), vec![2, 0]);
    assert!(ws
        .read("src/app/Impl.java")
        .contains("public class Impl implements api.GenericInterface<String> {"));
    assert!(ws
        .read("src/app/Box.java")
        .contains("public class Box<T> implements api.GenericInterface<T> {"));
    assert!(ws
        .read("src/app/Mismatch.java")
        .contains("public class Mismatch {"));

    let impl_mod = report
        .modifications
        .iter()
        .find(|m| m.class == "app.Impl")
        .unwrap();
    assert_eq!(impl_mod.interface, "api.GenericInterface");
    assert_eq!(impl_mod.type_arguments, vec!["java.lang.String".to_string()]);
    assert_eq!(impl_mod.clause, "api.GenericInterface<String>");
    assert_eq!(impl_mod.pass, 1);
    assert_eq!(sink.with_code("interface-added").len(), 2);
}

#[test]
fn primitive_returns_match_only_exactly() {
    let ws = Workspace::new();
    ws.write(
        "api/metrics/Counted.java",
        "package metrics;\n\npublic interface Counted {\n    int getCount();\n}\n",
    );
    ws.write(
        "src/metrics/IntCount.java",
        "package metrics;\n\npublic class IntCount {\n    public int getCount() { return 1; }\n}\n",
    );
    ws.write(
        "src/metrics/LongCount.java",
        "package metrics;\n\npublic class LongCount {\n    public long getCount() { return 1L; }\n}\n",
    );
    ws.write(
        "src/metrics/BoxedCount.java",
        "package metrics;\n\npublic class BoxedCount {\n    public Integer getCount() { return 1; }\n}\n",
    );

    let report = Retrofitter::new(ws.options(), &TracingSink).run().unwrap();

    let classes: Vec<&str> = report.modifications.iter().map(|m| m.class.as_str()).collect();
    assert_eq!(classes, vec!["metrics.IntCount"]);
    assert!(ws
        .read("src/metrics/IntCount.java")
        .contains("public class IntCount implements Counted {"));
    assert!(ws
        .read("src/metrics/LongCount.java")
        .contains("public class LongCount {"));
}

#[test]
fn cascading_matches_take_one_pass_each() {
    let ws = cascade_workspace();
    let sink = CollectingSink::new();
    let report = Retrofitter::new(ws.options(), &sink).run().unwrap();

    assert_eq!(report.pass_counts(), vec![1, 1, 0]);
    assert_eq!(
        report
            .modifications
            .iter()
            .map(|m| (m.pass, m.class.as_str(), m.interface.as_str()))
            .collect::<Vec<_>>(),
        vec![
            (1, "sample.SampleResult", "sample.SampleInterface"),
            (2, "sample.Sample", "sample.SampleInterface2"),
        ]
    );
    assert!(ws
        .read("src/sample/SampleResult.java")
        .contains("public class SampleResult implements SampleInterface {"));
    assert!(ws
        .read("src/sample/Sample.java")
        .contains("public class Sample implements SampleInterface2 {"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["modifications"][0]["clause"], "SampleInterface");
    assert_eq!(json["passes"][1]["files_written"], 1);
}

#[test]
fn rerunning_a_retrofitted_project_changes_nothing() {
    let ws = cascade_workspace();
    Retrofitter::new(ws.options(), &TracingSink).run().unwrap();
    let before = ws.read("src/sample/Sample.java");

    let report = Retrofitter::new(ws.options(), &TracingSink).run().unwrap();
    assert_eq!(report.pass_counts(), vec![0]);
    assert_eq!(ws.read("src/sample/Sample.java"), before);
}

#[test]
fn existing_ancestry_makes_a_match_redundant() {
    let ws = Workspace::new();
    ws.write(
        "api/api/HasName.java",
        "package api;\n\npublic interface HasName {\n    String getName();\n}\n",
    );
    let declared = "package app;

import api.HasName;

public class Declared implements HasName {
    public String getName() {
        return \"d\";
    }
}
";
    let child = "package app;

public class Child extends Base {
}
";
    ws.write("src/app/Declared.java", declared);
    ws.write(
        "src/app/Base.java",
        "package app;\n\npublic class Base implements api.HasName {\n    public String getName() { return \"b\"; }\n}\n",
    );
    ws.write("src/app/Child.java", child);

    let report = Retrofitter::new(ws.options(), &TracingSink).run().unwrap();
    assert_eq!(report.pass_counts(), vec![0]);
    assert_eq!(ws.read("src/app/Declared.java"), declared);
    assert_eq!(ws.read("src/app/Child.java"), child);
}

#[test]
fn unparseable_files_are_skipped_and_reported() {
    let ws = cascade_workspace();
    let broken = ws.write("src/sample/Broken.java", "package sample;\n\npublic class Broken {\n    void x( \n}\n");

    let sink = CollectingSink::new();
    let report = Retrofitter::new(ws.options(), &sink).run().unwrap();

    assert_eq!(report.pass_counts(), vec![1, 1, 0]);
    assert_eq!(report.parse_failures, 1);
    let failures = sink.with_code("parse-failure");
    assert_eq!(failures.len(), 3);
    assert_eq!(failures[0].path.as_deref(), Some(broken.as_path()));
    assert!(ws.read("src/sample/Broken.java").contains("void x( "));
}

#[test]
fn interfaces_need_a_source() {
    let ws = Workspace::new();
    let options = RetrofitOptions {
        scan_dir: ws.root().join("src"),
        interface_packages: vec!["com.example".into()],
        ..RetrofitOptions::default()
    };
    let err = Retrofitter::new(options, &TracingSink).run().unwrap_err();
    assert!(matches!(err, RetrofitError::NoInterfaceSource), "{err}");
}

#[test]
fn pass_cap_stops_runaway_runs() {
    let ws = cascade_workspace();
    let options = RetrofitOptions {
        max_passes: Some(1),
        ..ws.options()
    };
    let err = Retrofitter::new(options, &TracingSink).run().unwrap_err();
    assert!(matches!(err, RetrofitError::NoConvergence { passes: 1 }), "{err}");
    // The first pass was still persisted.
    assert!(ws
        .read("src/sample/SampleResult.java")
        .contains("implements SampleInterface"));
}

#[test]
fn missing_scan_directory_is_a_source_error() {
    let ws = Workspace::new();
    let options = RetrofitOptions {
        scan_dir: ws.root().join("does-not-exist"),
        ..ws.options()
    };
    let err = Retrofitter::new(options, &TracingSink).run().unwrap_err();
    assert!(matches!(err, RetrofitError::Source(_)), "{err}");
}

#[test]
fn a_sub_interface_added_in_the_same_pass_covers_its_super_interface() {
    let ws = Workspace::new();
    ws.write(
        "api/people/HasName.java",
        "package people;\n\npublic interface HasName {\n    String getName();\n}\n",
    );
    ws.write(
        "api/people/HasFullName.java",
        "package people;\n\npublic interface HasFullName extends HasName {\n    String getSurname();\n}\n",
    );
    ws.write(
        "src/people/Person.java",
        "package people;

public class Person {
    public String getName() {
        return \"Ada\";
    }

    public String getSurname() {
        return \"Lovelace\";
    }
}
",
    );

    let report = Retrofitter::new(ws.options(), &TracingSink).run().unwrap();

    assert_eq!(report.pass_counts(), vec![1, 0]);
    assert_eq!(report.modifications[0].interface, "people.HasFullName");
    assert!(ws
        .read("src/people/Person.java")
        .contains("public class Person implements HasFullName {"));
}

#[test]
fn class_parameters_must_be_assignable_to_interface_parameters() {
    let ws = Workspace::new();
    ws.write(
        "api/sinks/NumberSink.java",
        "package sinks;\n\npublic interface NumberSink {\n    void accept(Number value);\n}\n",
    );
    ws.write(
        "src/sinks/Narrow.java",
        "package sinks;\n\npublic class Narrow {\n    public void accept(Integer value) {\n    }\n}\n",
    );
    ws.write(
        "src/sinks/Wide.java",
        "package sinks;\n\npublic class Wide {\n    public void accept(Object value) {\n    }\n}\n",
    );

    let report = Retrofitter::new(ws.options(), &TracingSink).run().unwrap();

    let classes: Vec<&str> = report.modifications.iter().map(|m| m.class.as_str()).collect();
    assert_eq!(classes, vec!["sinks.Narrow"]);
    assert!(ws
        .read("src/sinks/Narrow.java")
        .contains("public class Narrow implements NumberSink {"));
    assert!(ws.read("src/sinks/Wide.java").contains("public class Wide {"));
}

#[test]
fn primitive_methods_do_not_implement_generic_ones() {
    let ws = Workspace::new();
    ws.write(
        "api/holders/Holder.java",
        "package holders;\n\npublic interface Holder<T> {\n    T get();\n\n    void set(T value);\n}\n",
    );
    let int_holder = "package holders;

public class IntHolder {
    public int get() {
        return 0;
    }

    public void set(int value) {
    }
}
";
    ws.write("src/holders/IntHolder.java", int_holder);

    let report = Retrofitter::new(ws.options(), &TracingSink).run().unwrap();

    assert_eq!(report.pass_counts(), vec![0]);
    assert_eq!(ws.read("src/holders/IntHolder.java"), int_holder);
}
