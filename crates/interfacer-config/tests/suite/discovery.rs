use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Mutex;

use interfacer_config::{discover_config_path, load_for_workspace, INTERFACER_CONFIG_ENV_VAR};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

struct EnvVarGuard {
    key: &'static str,
    prev: Option<OsString>,
}

impl EnvVarGuard {
    fn set(key: &'static str, value: &std::path::Path) -> Self {
        let prev = std::env::var_os(key);
        std::env::set_var(key, value);
        Self { key, prev }
    }

    fn unset(key: &'static str) -> Self {
        let prev = std::env::var_os(key);
        std::env::remove_var(key);
        Self { key, prev }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => std::env::set_var(self.key, v),
            None => std::env::remove_var(self.key),
        }
    }
}

#[test]
fn prefers_interfacer_toml_over_the_dotfile() {
    let _lock = ENV_LOCK.lock().unwrap();
    let _env = EnvVarGuard::unset(INTERFACER_CONFIG_ENV_VAR);

    let dir = tempdir().unwrap();
    assert_eq!(discover_config_path(dir.path()), None);

    std::fs::write(dir.path().join(".interfacer.toml"), "").unwrap();
    let dotfile = discover_config_path(dir.path()).unwrap();
    assert!(dotfile.ends_with(".interfacer.toml"));

    std::fs::write(dir.path().join("interfacer.toml"), "").unwrap();
    let main = discover_config_path(dir.path()).unwrap();
    assert!(main.ends_with("interfacer.toml"));
    assert!(!main.ends_with(".interfacer.toml"));
}

#[test]
fn env_override_wins_and_paths_resolve_against_the_config_file() {
    let _lock = ENV_LOCK.lock().unwrap();

    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("interfacer.toml"), "[scan]\ndir = \"ignored\"\n").unwrap();
    std::fs::create_dir_all(dir.path().join("conf")).unwrap();
    let override_path = dir.path().join("conf/custom.toml");
    std::fs::write(
        &override_path,
        "[scan]\ndir = \"../gen\"\n[interfaces]\nsource_dir = \"api\"\n",
    )
    .unwrap();
    let _env = EnvVarGuard::set(INTERFACER_CONFIG_ENV_VAR, &override_path);

    let (config, path) = load_for_workspace(dir.path()).unwrap();
    let conf_dir = override_path.canonicalize().unwrap().parent().unwrap().to_path_buf();
    assert_eq!(path, Some(override_path.canonicalize().unwrap()));
    assert_eq!(config.scan.dir, Some(conf_dir.join("../gen")));
    assert_eq!(config.interfaces.source_dir, Some(conf_dir.join("api")));
}

#[test]
fn missing_config_yields_defaults() {
    let _lock = ENV_LOCK.lock().unwrap();
    let _env = EnvVarGuard::unset(INTERFACER_CONFIG_ENV_VAR);

    let dir = tempdir().unwrap();
    let (config, path) = load_for_workspace(dir.path()).unwrap();
    assert_eq!(path, None::<PathBuf>);
    assert_eq!(config, Default::default());
}
