use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use interfacer_classpath::ClasspathEntry;
use interfacer_config::{init_tracing, load_for_workspace, split_packages, InterfacerConfig};
use interfacer_core::{InterfaceCatalog, RetrofitOptions, RetrofitReport, Retrofitter, TracingSink};
use interfacer_types::InterfaceOrigin;

#[derive(Parser)]
#[command(
    name = "interfacer",
    version,
    about = "Declare interfaces on Java classes that already implement them structurally"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Retrofit interfaces until a pass changes nothing, rewriting sources in place
    Run(ProjectArgs),
    /// Print the interface catalog without modifying anything
    Catalog(ProjectArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// Workspace root used for config discovery (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,
    /// Explicit config file (skips discovery)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Root of the classes to retrofit (defaults to the workspace root)
    #[arg(long)]
    scan_dir: Option<PathBuf>,
    /// Directory of interface sources
    #[arg(long)]
    interfaces_dir: Option<PathBuf>,
    /// Package prefix selecting classpath interfaces (repeatable, comma-separated)
    #[arg(long = "package", value_name = "PKG")]
    packages: Vec<String>,
    /// Class directory or jar (repeatable)
    #[arg(long = "classpath", value_name = "ENTRY")]
    classpath: Vec<PathBuf>,
    /// Fail if no fixpoint is reached within this many passes
    #[arg(long)]
    max_passes: Option<usize>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

impl ProjectArgs {
    fn load_config(&self) -> Result<InterfacerConfig> {
        match &self.config {
            Some(path) => InterfacerConfig::load_from_path(path)
                .with_context(|| format!("loading {}", path.display())),
            None => Ok(load_for_workspace(&self.path)?.0),
        }
    }

    /// Command-line values win over the config file.
    fn options(&self, config: &InterfacerConfig) -> RetrofitOptions {
        let packages = if self.packages.is_empty() {
            config.interfaces.package_filter()
        } else {
            split_packages(&self.packages)
        };
        let classpath = if self.classpath.is_empty() {
            config.classpath.entries.clone()
        } else {
            self.classpath.clone()
        };
        RetrofitOptions {
            scan_dir: self
                .scan_dir
                .clone()
                .or_else(|| config.scan.dir.clone())
                .unwrap_or_else(|| self.path.clone()),
            interfaces_dir: self
                .interfaces_dir
                .clone()
                .or_else(|| config.interfaces.source_dir.clone()),
            interface_packages: packages,
            classpath: classpath.into_iter().map(ClasspathEntry::from_path).collect(),
            max_passes: self.max_passes.or(config.engine.max_passes),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Run(args) => {
            let config = args.load_config()?;
            init_tracing(&config.logging);
            let options = args.options(&config);
            tracing::debug!(target: "interfacer.cli", scan_dir = %options.scan_dir.display(), "running retrofit");
            let report = Retrofitter::new(options, &TracingSink).run()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(0)
        }
        Command::Catalog(args) => {
            let config = args.load_config()?;
            init_tracing(&config.logging);
            let catalog = Retrofitter::new(args.options(&config), &TracingSink).catalog()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                print_catalog(&catalog);
            }
            Ok(0)
        }
    }
}

fn print_report(report: &RetrofitReport) {
    for pass in &report.passes {
        println!("pass {}: {} modification(s)", pass.pass, pass.modifications);
        for m in report.modifications.iter().filter(|m| m.pass == pass.pass) {
            println!("  {} implements {} ({})", m.class, m.clause, m.path.display());
        }
    }
    println!(
        "converged after {} pass(es), {} interface(s) added",
        report.passes.len(),
        report.modifications.len()
    );
    if report.parse_failures > 0 {
        println!("skipped {} unparseable file(s)", report.parse_failures);
    }
}

fn print_catalog(catalog: &InterfaceCatalog) {
    for iface in catalog.iter() {
        let params = if iface.is_generic() {
            format!("<{}>", iface.type_params.join(", "))
        } else {
            String::new()
        };
        let origin = match &iface.origin {
            InterfaceOrigin::Classpath => "classpath".to_string(),
            InterfaceOrigin::Source(path) => path.display().to_string(),
        };
        println!("{}{params} ({origin})", iface.name);
        for method in &iface.methods {
            let args: Vec<String> = method.params.iter().map(ToString::to_string).collect();
            println!("  {} {}({})", method.return_type, method.name, args.join(", "));
        }
    }
}
