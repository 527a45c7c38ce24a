//! Classpath scanning: class directories and jars indexed into lightweight stubs that can be
//! turned into [`interfacer_types::ClassDef`]s on demand.

#![forbid(unsafe_code)]

mod convert;

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use interfacer_classfile::{ClassFile, ACC_ANNOTATION, ACC_INTERFACE};

pub use crate::convert::{internal_to_canonical, to_class_def};

#[derive(Debug, Error)]
pub enum ClasspathError {
    #[error("failed to read classpath entry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open jar {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl ClasspathError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        ClasspathError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn zip(path: &Path, source: zip::result::ZipError) -> Self {
        ClasspathError::Zip {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClasspathEntry {
    ClassDir(PathBuf),
    Jar(PathBuf),
}

impl ClasspathEntry {
    /// `.jar`/`.zip` files are archives; anything else is treated as a class directory.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_archive = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"));
        if is_archive {
            ClasspathEntry::Jar(path)
        } else {
            ClasspathEntry::ClassDir(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ClasspathEntry::ClassDir(p) | ClasspathEntry::Jar(p) => p,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathMethodStub {
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub access_flags: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathClassStub {
    /// Dotted binary name, e.g. `java.util.Map$Entry`.
    pub binary_name: String,
    pub internal_name: String,
    pub access_flags: u16,
    pub super_internal_name: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<String>,
    pub methods: Vec<ClasspathMethodStub>,
}

impl ClasspathClassStub {
    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    pub fn is_annotation(&self) -> bool {
        self.access_flags & ACC_ANNOTATION != 0
    }

    pub fn package(&self) -> &str {
        self.binary_name
            .rsplit_once('.')
            .map(|(pkg, _)| pkg)
            .unwrap_or("")
    }
}

/// A classfile that could not be parsed; it is left out of the index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedClass {
    /// File path, or `<jar>!/<entry>` for archive members.
    pub location: String,
    pub error: interfacer_classfile::Error,
}

#[derive(Clone, Debug, Default)]
pub struct ClasspathIndex {
    stubs_by_binary: BTreeMap<String, ClasspathClassStub>,
    malformed: Vec<MalformedClass>,
}

impl ClasspathIndex {
    /// Indexes `entries` in order; the first entry defining a class wins.
    ///
    /// Entries that do not exist are skipped with a warning. Unreadable entries are errors.
    pub fn build(entries: &[ClasspathEntry]) -> Result<Self, ClasspathError> {
        let mut index = ClasspathIndex::default();

        for entry in entries {
            if !entry.path().exists() {
                tracing::warn!(
                    target: "interfacer.classpath",
                    path = %entry.path().display(),
                    "classpath entry does not exist; skipping"
                );
                continue;
            }

            let stubs = match entry {
                ClasspathEntry::ClassDir(dir) => index_class_dir(dir, &mut index.malformed)?,
                ClasspathEntry::Jar(path) => index_jar(path, &mut index.malformed)?,
            };
            tracing::debug!(
                target: "interfacer.classpath",
                path = %entry.path().display(),
                classes = stubs.len(),
                "indexed classpath entry"
            );

            for stub in stubs {
                index
                    .stubs_by_binary
                    .entry(stub.binary_name.clone())
                    .or_insert(stub);
            }
        }

        for bad in &index.malformed {
            tracing::warn!(
                target: "interfacer.classpath",
                location = %bad.location,
                error = %bad.error,
                "skipping malformed classfile"
            );
        }

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.stubs_by_binary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs_by_binary.is_empty()
    }

    pub fn malformed(&self) -> &[MalformedClass] {
        &self.malformed
    }

    pub fn lookup_binary(&self, binary_name: &str) -> Option<&ClasspathClassStub> {
        self.stubs_by_binary.get(binary_name)
    }

    pub fn stubs(&self) -> impl Iterator<Item = &ClasspathClassStub> {
        self.stubs_by_binary.values()
    }

    /// Interface types (annotations excluded) whose package is one of `packages` or nested
    /// beneath one of them. An empty filter matches nothing.
    pub fn interfaces_in_packages(&self, packages: &[String]) -> Vec<&ClasspathClassStub> {
        self.stubs()
            .filter(|stub| stub.is_interface() && !stub.is_annotation())
            .filter(|stub| {
                packages
                    .iter()
                    .any(|prefix| package_matches(stub.package(), prefix))
            })
            .collect()
    }
}

/// `com.example` matches `com.example` and `com.example.api`, but not `com.examples`.
pub fn package_matches(package: &str, prefix: &str) -> bool {
    let prefix = prefix.trim().trim_end_matches('.');
    if prefix.is_empty() {
        return false;
    }
    match package.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

fn is_ignored_class(internal_name: &str) -> bool {
    internal_name == "module-info"
        || internal_name == "package-info"
        || internal_name.ends_with("/package-info")
}

fn index_class_dir(
    dir: &Path,
    malformed: &mut Vec<MalformedClass>,
) -> Result<Vec<ClasspathClassStub>, ClasspathError> {
    let mut out = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            ClasspathError::io(&path, err.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension() != Some(OsStr::new("class")) {
            continue;
        }

        let bytes = std::fs::read(entry.path()).map_err(|err| ClasspathError::io(entry.path(), err))?;
        match ClassFile::parse(&bytes) {
            Ok(cf) if is_ignored_class(&cf.this_class) => {}
            Ok(cf) => out.push(stub_from_classfile(cf)),
            Err(error) => malformed.push(MalformedClass {
                location: entry.path().display().to_string(),
                error,
            }),
        }
    }
    Ok(out)
}

fn index_jar(
    path: &Path,
    malformed: &mut Vec<MalformedClass>,
) -> Result<Vec<ClasspathClassStub>, ClasspathError> {
    let file = std::fs::File::open(path).map_err(|err| ClasspathError::io(path, err))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|err| ClasspathError::zip(path, err))?;
    let is_multi_release = jar_is_multi_release(&mut archive);

    // Multi-release jars keep version-specific classes under `META-INF/versions/<n>/`. The base
    // class always wins; versioned classes only fill gaps, highest version first.
    let mut best: HashMap<String, (u32, ClasspathClassStub)> = HashMap::new();

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|err| ClasspathError::zip(path, err))?;
        if !file.is_file() {
            continue;
        }
        let name = file.name().to_owned();
        if !name.ends_with(".class") {
            continue;
        }

        let version = match name.strip_prefix("META-INF/") {
            None => 0,
            Some(rest) if is_multi_release => {
                let Some(rest) = rest.strip_prefix("versions/") else {
                    continue;
                };
                let Some((version, _)) = rest.split_once('/') else {
                    continue;
                };
                match version.parse::<u32>() {
                    Ok(v) => v,
                    Err(_) => continue,
                }
            }
            Some(_) => continue,
        };

        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)
            .map_err(|err| ClasspathError::io(path, err))?;
        let cf = match ClassFile::parse(&bytes) {
            Ok(cf) => cf,
            Err(error) => {
                malformed.push(MalformedClass {
                    location: format!("{}!/{name}", path.display()),
                    error,
                });
                continue;
            }
        };
        if is_ignored_class(&cf.this_class) {
            continue;
        }

        let stub = stub_from_classfile(cf);
        let replace = match best.get(&stub.binary_name) {
            None => true,
            Some((0, _)) => false,
            Some((existing, _)) => version == 0 || version > *existing,
        };
        if replace {
            best.insert(stub.binary_name.clone(), (version, stub));
        }
    }

    let mut out: Vec<ClasspathClassStub> = best.into_values().map(|(_, stub)| stub).collect();
    out.sort_by(|a, b| a.binary_name.cmp(&b.binary_name));
    Ok(out)
}

fn jar_is_multi_release<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> bool {
    let Ok(mut file) = archive.by_name("META-INF/MANIFEST.MF") else {
        return false;
    };
    let mut manifest = String::new();
    if file.read_to_string(&mut manifest).is_err() {
        return false;
    }
    manifest.lines().any(|line| {
        line.split_once(':').is_some_and(|(key, value)| {
            key.trim().eq_ignore_ascii_case("Multi-Release")
                && value.trim().eq_ignore_ascii_case("true")
        })
    })
}

fn stub_from_classfile(cf: ClassFile) -> ClasspathClassStub {
    let internal_name = cf.this_class;
    ClasspathClassStub {
        binary_name: internal_name.replace('/', "."),
        internal_name,
        access_flags: cf.access_flags,
        super_internal_name: cf.super_class,
        interfaces: cf.interfaces,
        signature: cf.signature,
        methods: cf
            .methods
            .into_iter()
            .filter(|m| !m.is_synthetic())
            .map(|m| ClasspathMethodStub {
                name: m.name,
                descriptor: m.descriptor,
                signature: m.signature,
                access_flags: m.access_flags,
            })
            .collect(),
    }
}
