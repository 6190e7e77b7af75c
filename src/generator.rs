use std::{fmt, path::PathBuf, str::FromStr};

use serde::Serialize;

use crate::error::LaunchError;

const VS_GEN: &str = "Visual Studio 14 2015";
const WIN64: &str = "Win64";
const UNIX_GEN: &str = "Unix Makefiles";
const ECLIPSE_GEN: &str = "Eclipse CDT4 - Unix Makefiles";

/// The CMake generators the launcher knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    Vs14,
    Make,
    Eclipse,
}

impl Generator {
    pub const ALL: [Generator; 3] = [Generator::Vs14, Generator::Make, Generator::Eclipse];

    /// Short alias accepted on the command line.
    pub fn alias(&self) -> &'static str {
        match self {
            Generator::Vs14 => "vs14",
            Generator::Make => "make",
            Generator::Eclipse => "eclipse",
        }
    }

    /// Generator name without a platform qualifier.
    pub fn base_name(&self) -> &'static str {
        match self {
            Generator::Vs14 => VS_GEN,
            Generator::Make => UNIX_GEN,
            Generator::Eclipse => ECLIPSE_GEN,
        }
    }

    pub fn platform_qualifier(&self) -> Option<&'static str> {
        match self {
            Generator::Vs14 => Some(WIN64),
            Generator::Make | Generator::Eclipse => None,
        }
    }

    /// Full value passed to `cmake -G`.
    pub fn cmake_name(&self) -> String {
        match self.platform_qualifier() {
            Some(qualifier) => format!("{} {}", self.base_name(), qualifier),
            None => self.base_name().to_string(),
        }
    }

    pub fn is_win64(&self) -> bool {
        self.platform_qualifier() == Some(WIN64)
    }

    /// Build directory relative to the project root.
    pub fn build_dir(&self) -> PathBuf {
        let parts: &[&str] = match self {
            Generator::Vs14 => &["build", "Visual_Studio_14_2015", "x64"],
            Generator::Make => &["build", "Unix_Makefiles"],
            Generator::Eclipse => &["build", "Eclipse_CDT4-Unix_Makefiles"],
        };
        parts.iter().collect()
    }
}

impl FromStr for Generator {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Generator::ALL
            .into_iter()
            .find(|g| g.alias() == lowered)
            .ok_or_else(|| LaunchError::InvalidGenerator(s.to_string()))
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}
