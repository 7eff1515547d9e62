//! `--unpack` directive parsing

use crate::utils::error::BundleError;
use std::str::FromStr;

/// Help text for the `--unpack` flag
pub const UNPACK_HELP: &str = "\
Controls when the config and data directories are unpacked:
    --unpack unpack[,force]    Unpack; synonyms are 1, t, true (all case insensitive)
    --unpack suppress          Don't unpack; synonyms are 0, f, false (all case insensitive)
    --unpack detect[,force]    (default) Unpack if neither directory exists
    --unpack only[,force]      Unpack then exit

    Adding force will overwrite existing files";

/// When to unpack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnpackMode {
    /// Always unpack
    Unpack,
    /// Never unpack
    Suppress,
    /// Unpack only if neither the config nor the data directory exists
    #[default]
    Detect,
    /// Unpack, then tell the host to exit
    Only,
}

impl std::fmt::Display for UnpackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unpack => write!(f, "unpack"),
            Self::Suppress => write!(f, "suppress"),
            Self::Detect => write!(f, "detect"),
            Self::Only => write!(f, "only"),
        }
    }
}

/// Parsed `<mode>[,force]` directive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackDirective {
    pub mode: UnpackMode,
    /// Overwrite existing destination files instead of skipping them
    pub force: bool,
}

impl UnpackDirective {
    pub fn new(mode: UnpackMode, force: bool) -> Self {
        Self { mode, force }
    }
}

impl std::fmt::Display for UnpackDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.force {
            write!(f, "{},force", self.mode)
        } else {
            write!(f, "{}", self.mode)
        }
    }
}

impl FromStr for UnpackDirective {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(',').collect();

        let force = match tokens.as_slice() {
            [_] => false,
            [_, modifier] if modifier.eq_ignore_ascii_case("force") => true,
            [_, modifier] => {
                return Err(BundleError::InvalidDirective(format!(
                    "bad second argument: {}",
                    modifier
                )))
            }
            _ => {
                return Err(BundleError::InvalidDirective(format!(
                    "bad number of arguments: {}",
                    s
                )))
            }
        };

        let mode = match tokens[0].to_ascii_lowercase().as_str() {
            "" | "unpack" | "1" | "t" | "true" => UnpackMode::Unpack,
            "suppress" | "0" | "f" | "false" => UnpackMode::Suppress,
            "detect" => UnpackMode::Detect,
            "only" => UnpackMode::Only,
            _ => {
                return Err(BundleError::InvalidDirective(format!(
                    "bad argument: {}",
                    s
                )))
            }
        };

        Ok(Self { mode, force })
    }
}
