use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cmake_launcher::{BuildRequest, HostPlatform, ResolvedPlan, SystemRunner, execute};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Cross-platform CMake build launcher
#[derive(Parser)]
#[command(name = "cmake-launcher")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Platform generator: vs14, make or eclipse
    #[arg(short, long = "gen")]
    generator: String,

    /// Debug level: "yes" configures a debug build
    #[arg(short, long, default_value = "no")]
    debug: String,

    /// Configure preset from CMakePresets.json in the project root
    #[arg(long)]
    preset: Option<String>,

    /// cmake executable to use
    #[arg(long, env = "CMAKE_LAUNCHER_CMAKE", default_value = "cmake")]
    cmake: PathBuf,

    /// Print the resolved plan as JSON instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct DryRun<'a> {
    plan: &'a ResolvedPlan,
    actions: Vec<cmake_launcher::Action>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let root = std::env::current_dir().context("reading current directory")?;

    let mut request = BuildRequest::parse(&cli.generator, &cli.debug)?;
    if let Some(preset) = cli.preset {
        request = request.with_preset(preset);
    }

    let plan = ResolvedPlan::resolve(&request, root, HostPlatform::current())?
        .with_cmake(cli.cmake);

    if cli.dry_run {
        let dry_run = DryRun {
            actions: plan.actions(),
            plan: &plan,
        };
        let json = serde_json::to_string_pretty(&dry_run).context("serialising plan")?;
        println!("{json}");
        return Ok(());
    }

    execute(&plan, &mut SystemRunner::new())
        .with_context(|| format!("building with generator `{}`", plan.generator_name))?;
    info!("build finished in {}", plan.build_dir.display());

    Ok(())
}
