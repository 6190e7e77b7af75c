use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{debug, info};

use crate::{
    error::{LaunchError, Result},
    plan::{Action, BuildRequest, HostPlatform, Invocation, ResolvedPlan},
};

/// Captured output of a finished child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutput {
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Carries out plan actions. [`SystemRunner`] touches the real filesystem and
/// spawns processes; tests swap in a recorder.
pub trait Runner {
    /// Called once before any action runs.
    fn prepare(&mut self, _plan: &ResolvedPlan) -> Result<()> {
        Ok(())
    }

    /// Remove `path` recursively. A missing directory is not an error.
    fn remove_dir(&mut self, path: &Path) -> Result<()>;

    fn create_dir(&mut self, path: &Path) -> Result<()>;

    fn run(&mut self, invocation: &Invocation) -> Result<StepOutput>;
}

/// Runs actions against the host, relaying child stdout to `out`.
pub struct SystemRunner<W = io::Stdout> {
    out: W,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> SystemRunner<W> {
    pub fn with_output(out: W) -> Self {
        Self { out }
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

impl<W: Write> Runner for SystemRunner<W> {
    fn prepare(&mut self, plan: &ResolvedPlan) -> Result<()> {
        let cmake = which::which(&plan.cmake)?;
        debug!(cmake = %cmake.display(), "found cmake");
        Ok(())
    }

    fn remove_dir(&mut self, path: &Path) -> Result<()> {
        info!("removing {}", path.display());
        match std::fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} does not exist, nothing to clean", path.display());
                Ok(())
            }
            Err(source) => Err(io_error(path, source)),
        }
    }

    fn create_dir(&mut self, path: &Path) -> Result<()> {
        info!("creating {}", path.display());
        std::fs::create_dir_all(path).map_err(|source| io_error(path, source))
    }

    fn run(&mut self, invocation: &Invocation) -> Result<StepOutput> {
        let program = which::which(&invocation.program)?;
        info!(cwd = %invocation.cwd.display(), "{invocation}");

        let output = Command::new(&program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .output()
            .map_err(|source| LaunchError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        let step = StepOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        self.out
            .write_all(step.stdout.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|source| io_error(Path::new("<stdout>"), source))?;

        Ok(step)
    }
}

fn io_error(path: &Path, source: io::Error) -> LaunchError {
    LaunchError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Run every action of `plan` in order, stopping at the first failing step.
pub fn execute<R>(plan: &ResolvedPlan, runner: &mut R) -> Result<()>
where
    R: Runner + ?Sized, {
    runner.prepare(plan)?;

    for action in plan.actions() {
        match action {
            Action::RemoveDir { path } => runner.remove_dir(&path)?,
            Action::CreateDir { path } => runner.create_dir(&path)?,
            Action::Run(invocation) => {
                let output = runner.run(&invocation)?;
                if !output.success {
                    return Err(LaunchError::BuildFailed {
                        step: invocation.step,
                        exit_code: output.exit_code,
                        stderr: output.stderr,
                    });
                }
                debug!(step = %invocation.step, "step finished");
            }
        }
    }

    Ok(())
}

/// Configure and build the project at `root` with the generator named by
/// `generator_alias`. `debug_level` of `"yes"` requests a debug build.
pub fn run<P, R>(generator_alias: &str, debug_level: &str, root: P, runner: &mut R) -> Result<()>
where
    P: Into<PathBuf>,
    R: Runner + ?Sized, {
    let request = BuildRequest::parse(generator_alias, debug_level)?;
    let plan = ResolvedPlan::resolve(&request, root, HostPlatform::current())?;
    execute(&plan, runner)
}
