use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn interfacer() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("interfacer"));
    cmd.env_remove("INTERFACER_CONFIG_PATH").env("RUST_LOG", "off");
    cmd
}

fn tiny_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("api/api/HasName.java")
        .write_str("package api;\n\npublic interface HasName {\n    String getName();\n}\n")
        .unwrap();
    temp.child("src/app/Person.java")
        .write_str(
            r#"package app;

public class Person {
    public String getName() {
        return "p";
    }
}
"#,
        )
        .unwrap();
    temp
}

#[test]
fn help_mentions_commands() {
    interfacer().arg("--help").assert().success().stdout(
        predicate::str::contains("run").and(predicate::str::contains("catalog")),
    );
}

#[test]
fn run_json_reports_and_rewrites_sources() {
    let temp = tiny_project();

    let output = interfacer()
        .arg("run")
        .arg(temp.path())
        .arg("--scan-dir")
        .arg(temp.path().join("src"))
        .arg("--interfaces-dir")
        .arg(temp.path().join("api"))
        .arg("--json")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["passes"].as_array().unwrap().len(), 2);
    assert_eq!(v["modifications"][0]["class"], "app.Person");
    assert_eq!(v["modifications"][0]["clause"], "api.HasName");

    temp.child("src/app/Person.java")
        .assert(predicate::str::contains("public class Person implements api.HasName {"));
}

#[test]
fn run_reads_interfacer_toml_from_the_workspace_root() {
    let temp = tiny_project();
    temp.child("interfacer.toml")
        .write_str("[interfaces]\nsource_dir = \"api\"\n\n[scan]\ndir = \"src\"\n\n[logging]\nlevel = \"warn\"\n")
        .unwrap();

    interfacer()
        .arg("run")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("app.Person implements api.HasName")
                .and(predicate::str::contains("converged after 2 pass(es), 1 interface(s) added")),
        );
}

#[test]
fn catalog_lists_interfaces_without_touching_sources() {
    let temp = tiny_project();

    let output = interfacer()
        .arg("catalog")
        .arg(temp.path())
        .arg("--scan-dir")
        .arg(temp.path().join("src"))
        .arg("--interfaces-dir")
        .arg(temp.path().join("api"))
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v[0]["name"], "api.HasName");
    assert_eq!(v[0]["origin"]["kind"], "source");
    assert_eq!(v[0]["methods"][0]["name"], "getName");

    temp.child("src/app/Person.java")
        .assert(predicate::str::contains("public class Person {"));
}

#[test]
fn missing_interface_source_exits_with_code_2() {
    let temp = tiny_project();

    interfacer()
        .arg("run")
        .arg(temp.path())
        .arg("--package")
        .arg("com.example.api")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no interface source configured"));
}
