//! # cmake-launcher
//!
//! Configure and build a CMake project with one of a fixed set of generators.
//!
//! The launcher maps a generator alias (`vs14`, `make` or `eclipse`) to a CMake
//! generator name and a build directory under `build/`, wipes and recreates
//! that directory, runs `cmake -G <generator> <project>` from inside it and then
//! `cmake --build <build dir>` from the project root. Each step's exit code is
//! checked and the first failure is reported with the step, the code and the
//! captured stderr.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cmake_launcher::{SystemRunner, run};
//!
//! let root = std::env::current_dir().unwrap();
//! let result = run("make", "yes", root, &mut SystemRunner::new());
//!
//! assert!(result.is_ok());
//! ```
//!
//! ```no_run
//! use cmake_launcher::{BuildRequest, HostPlatform, ResolvedPlan, SystemRunner, execute};
//!
//! // Resolve first, inspect, then run
//! let request = BuildRequest::parse("eclipse", "no").unwrap().with_preset("default");
//! let plan = ResolvedPlan::resolve(&request, "./my_project", HostPlatform::current()).unwrap();
//! println!("{}", plan.configure_invocation());
//!
//! execute(&plan, &mut SystemRunner::new()).unwrap();
//! ```

pub mod cmake;
pub mod cmd;
pub mod error;
pub mod generator;
pub mod plan;

pub use cmd::{Runner, StepOutput, SystemRunner, execute, run};
pub use error::{LaunchError, Result};
pub use generator::Generator;
pub use plan::{Action, BuildRequest, HostPlatform, Invocation, ResolvedPlan, Step};
