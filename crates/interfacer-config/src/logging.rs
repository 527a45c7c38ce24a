use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::{Mutex, Once};

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt, TestWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Append logs to this file as well. Left out silently if it cannot be opened.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_owned()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            stderr: true,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// `level` as filter directives, with `RUST_LOG` appended so it can refine them.
    fn directives(&self, rust_log: Option<&str>) -> String {
        let level = match self.level.trim() {
            "" => default_level(),
            level if level.eq_ignore_ascii_case("warning") => "warn".to_owned(),
            level if !level.contains(['=', ',']) => level.to_ascii_lowercase(),
            directives => directives.to_owned(),
        };
        match rust_log.map(str::trim).filter(|extra| !extra.is_empty()) {
            Some(extra) => format!("{level},{extra}"),
            None => level,
        }
    }

    /// The subscriber filter. Invalid directives are dropped; `info` is the fallback level.
    pub fn filter(&self) -> EnvFilter {
        let rust_log = std::env::var("RUST_LOG").ok();
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .parse_lossy(self.directives(rust_log.as_deref()))
    }

    fn open_file(&self) -> Option<File> {
        let path = self.file.as_ref()?;
        OpenOptions::new().create(true).append(true).open(path).ok()
    }

    /// Stderr and/or the log file; a sink that drops everything when both are off.
    fn sink(&self) -> BoxMakeWriter {
        let stderr = self.stderr.then(|| {
            // `TestWriter` goes through `eprint!`, which `cargo test` captures.
            if cfg!(debug_assertions) {
                BoxMakeWriter::new(TestWriter::with_stderr)
            } else {
                BoxMakeWriter::new(std::io::stderr)
            }
        });
        match (stderr, self.open_file()) {
            (Some(stderr), Some(file)) => BoxMakeWriter::new(stderr.and(Mutex::new(file))),
            (Some(stderr), None) => stderr,
            (None, Some(file)) => BoxMakeWriter::new(Mutex::new(file)),
            (None, None) => BoxMakeWriter::new(std::io::sink),
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber. Only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let fmt = tracing_subscriber::fmt::layer()
            .with_writer(config.sink())
            .with_ansi(false);
        let layer = if config.json {
            fmt.json().boxed()
        } else {
            fmt.boxed()
        };

        let subscriber = tracing_subscriber::registry().with(config.filter()).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!(target: "interfacer.config", level = %config.level, json = config.json, "tracing initialised");
        }
    });
}
