//! Turning a build request into the ordered list of things to do.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    cmake::CMakePresets,
    error::{LaunchError, Result},
    generator::Generator,
};

pub const DEBUG_FLAG: &str = "-DCMAKE_BUILD_TYPE=Debug";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub generator: Generator,
    pub debug: bool,
    pub preset: Option<String>,
}

impl BuildRequest {
    /// Parse a generator alias and a debug level (`"yes"` enables debug,
    /// anything else does not). Both are case-insensitive.
    pub fn parse(generator_alias: &str, debug_level: &str) -> Result<Self> {
        Ok(Self {
            generator: generator_alias.parse()?,
            debug: debug_level.trim().eq_ignore_ascii_case("yes"),
            preset: None,
        })
    }

    pub fn with_preset<T>(mut self, preset: T) -> Self
    where
        T: Into<String>, {
        self.preset = Some(preset.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Windows,
    Unix,
}

impl HostPlatform {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostPlatform::Windows
        } else {
            HostPlatform::Unix
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Configure,
    Build,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Configure => "configure",
            Step::Build => "build",
        })
    }
}

/// A single child process to spawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub step: Step,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    RemoveDir { path: PathBuf },
    CreateDir { path: PathBuf },
    Run(Invocation),
}

/// Everything needed to configure and build, fixed before anything runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPlan {
    pub generator: Generator,
    pub generator_name: String,
    pub win64: bool,
    /// Relative to `source_dir`.
    pub build_dir: PathBuf,
    pub debug_flag: Option<String>,
    pub source_dir: PathBuf,
    pub host: HostPlatform,
    pub preset: Option<String>,
    pub cmake: PathBuf,
}

impl ResolvedPlan {
    /// Resolve `request` against the project at `source_dir`.
    ///
    /// A relative `source_dir` is taken from the current directory, since the
    /// configure step runs from inside the build tree. A requested preset must
    /// exist in `source_dir/CMakePresets.json`.
    pub fn resolve<P>(request: &BuildRequest, source_dir: P, host: HostPlatform) -> Result<Self>
    where
        P: Into<PathBuf>, {
        let source_dir = source_dir.into();
        let source_dir = std::path::absolute(&source_dir).map_err(|source| LaunchError::Io {
            path: source_dir,
            source,
        })?;
        let generator = request.generator;

        let preset = match &request.preset {
            Some(name) => {
                let presets = CMakePresets::new(&source_dir)?;
                Some(presets.require(name)?.get_name().to_string())
            }
            None => None,
        };

        let plan = Self {
            generator,
            generator_name: generator.cmake_name(),
            win64: generator.is_win64(),
            build_dir: generator.build_dir(),
            debug_flag: request.debug.then(|| DEBUG_FLAG.to_string()),
            source_dir,
            host,
            preset,
            cmake: PathBuf::from("cmake"),
        };
        debug!(?plan, "resolved build plan");
        Ok(plan)
    }

    pub fn with_cmake<T>(mut self, cmake: T) -> Self
    where
        T: Into<PathBuf>, {
        self.cmake = cmake.into();
        self
    }

    /// Absolute (or root-relative) location of the build directory.
    pub fn build_path(&self) -> PathBuf {
        self.source_dir.join(&self.build_dir)
    }

    pub fn configure_invocation(&self) -> Invocation {
        let mut args = vec!["-G".to_string(), self.generator_name.clone()];
        match &self.preset {
            // a preset's binaryDir would otherwise win over the build tree
            Some(preset) => args.extend([
                format!("--preset={preset}"),
                "-S".to_string(),
                path_arg(&self.source_dir),
                "-B".to_string(),
                path_arg(&self.build_path()),
            ]),
            None => args.push(path_arg(&self.source_dir)),
        }

        match (&self.debug_flag, self.host) {
            (Some(flag), HostPlatform::Unix) => args.push(flag.clone()),
            (Some(_), HostPlatform::Windows) => {
                warn!("debug build requested but the debug flag is not passed on windows hosts");
            }
            (None, _) => {}
        }

        Invocation {
            step: Step::Configure,
            program: self.cmake.clone(),
            args,
            cwd: self.build_path(),
        }
    }

    pub fn build_invocation(&self) -> Invocation {
        Invocation {
            step: Step::Build,
            program: self.cmake.clone(),
            args: vec!["--build".to_string(), path_arg(&self.build_dir)],
            cwd: self.source_dir.clone(),
        }
    }

    /// Clean, recreate, configure, build.
    pub fn actions(&self) -> Vec<Action> {
        vec![
            Action::RemoveDir { path: self.build_path() },
            Action::CreateDir { path: self.build_path() },
            Action::Run(self.configure_invocation()),
            Action::Run(self.build_invocation()),
        ]
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(alias: &str, debug: &str, host: HostPlatform) -> ResolvedPlan {
        let request = BuildRequest::parse(alias, debug).unwrap();
        ResolvedPlan::resolve(&request, "/work/proj", host).unwrap()
    }

    #[test]
    fn debug_level_parsing() {
        assert!(BuildRequest::parse("make", "yes").unwrap().debug);
        assert!(BuildRequest::parse("make", "YES").unwrap().debug);
        assert!(!BuildRequest::parse("make", "no").unwrap().debug);
        assert!(!BuildRequest::parse("make", "true").unwrap().debug);
        assert!(!BuildRequest::parse("make", "").unwrap().debug);
    }

    #[test]
    fn make_without_debug() {
        let plan = plan("make", "no", HostPlatform::Unix);
        let configure = plan.configure_invocation();
        assert_eq!(configure.args, vec!["-G", "Unix Makefiles", "/work/proj"]);
        assert_eq!(configure.cwd, Path::new("/work/proj").join("build").join("Unix_Makefiles"));

        let build = plan.build_invocation();
        assert_eq!(build.args[0], "--build");
        assert_eq!(PathBuf::from(&build.args[1]), Path::new("build").join("Unix_Makefiles"));
        assert_eq!(build.cwd, Path::new("/work/proj"));
    }

    #[test]
    fn debug_flag_appended_on_unix() {
        let configure = plan("eclipse", "yes", HostPlatform::Unix).configure_invocation();
        assert_eq!(configure.args.last().map(String::as_str), Some(DEBUG_FLAG));
    }

    #[test]
    fn debug_flag_omitted_on_windows() {
        let plan = plan("vs14", "yes", HostPlatform::Windows);
        assert_eq!(plan.debug_flag.as_deref(), Some(DEBUG_FLAG));
        let configure = plan.configure_invocation();
        assert!(configure.args.contains(&"Visual Studio 14 2015 Win64".to_string()));
        assert!(configure.args.contains(&"/work/proj".to_string()));
        assert!(!configure.args.iter().any(|a| a == DEBUG_FLAG));
    }

    #[test]
    fn vs14_on_unix_keeps_debug_flag() {
        let configure = plan("vs14", "yes", HostPlatform::Unix).configure_invocation();
        assert_eq!(
            configure.args,
            vec!["-G", "Visual Studio 14 2015 Win64", "/work/proj", DEBUG_FLAG]
        );
    }

    #[test]
    fn actions_are_ordered() {
        let plan = plan("make", "no", HostPlatform::Unix);
        let actions = plan.actions();
        assert_eq!(actions.len(), 4);
        assert!(matches!(&actions[0], Action::RemoveDir { path } if *path == plan.build_path()));
        assert!(matches!(&actions[1], Action::CreateDir { path } if *path == plan.build_path()));
        assert!(matches!(&actions[2], Action::Run(inv) if inv.step == Step::Configure));
        assert!(matches!(&actions[3], Action::Run(inv) if inv.step == Step::Build));
    }

    #[test]
    fn invocation_display_quotes_spaced_args() {
        let configure = plan("make", "no", HostPlatform::Unix).configure_invocation();
        assert_eq!(configure.to_string(), "cmake -G \"Unix Makefiles\" /work/proj");
    }

    #[test]
    fn preset_is_checked_and_passed_to_configure() {
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/hello");
        let request = BuildRequest::parse("make", "no").unwrap().with_preset("default");
        let plan = ResolvedPlan::resolve(&request, &fixture, HostPlatform::Unix).unwrap();
        let configure = plan.configure_invocation();
        assert_eq!(
            configure.args[2..],
            [
                "--preset=default".to_string(),
                "-S".to_string(),
                path_arg(&fixture),
                "-B".to_string(),
                path_arg(&fixture.join("build").join("Unix_Makefiles")),
            ]
        );

        let request = BuildRequest::parse("make", "no").unwrap().with_preset("nope");
        let err = ResolvedPlan::resolve(&request, &fixture, HostPlatform::Unix).unwrap_err();
        assert!(matches!(err, crate::error::LaunchError::PresetNotFound(ref n) if n == "nope"));
    }

    #[test]
    fn relative_root_is_made_absolute() {
        let request = BuildRequest::parse("make", "no").unwrap();
        let plan = ResolvedPlan::resolve(&request, "my_project", HostPlatform::Unix).unwrap();
        let expected = std::env::current_dir().unwrap().join("my_project");

        assert_eq!(plan.source_dir, expected);
        let configure = plan.configure_invocation();
        assert_eq!(configure.args[2], path_arg(&expected));
        assert_eq!(configure.cwd, expected.join("build").join("Unix_Makefiles"));
        assert_eq!(plan.build_invocation().cwd, expected);
    }

    #[test]
    fn plan_serializes_to_json() {
        let plan = plan("make", "yes", HostPlatform::Unix);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["generator"], "make");
        assert_eq!(json["generator_name"], "Unix Makefiles");
        assert_eq!(json["win64"], false);
        assert_eq!(json["debug_flag"], DEBUG_FLAG);
        assert_eq!(json["host"], "unix");
    }
}
