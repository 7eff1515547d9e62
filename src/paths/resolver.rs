//! Platform config/data directory resolution

use super::env::{Environment, ProcessEnv};
use std::path::{Path, PathBuf};

/// Host platform family, as far as directory conventions go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    /// Linux, the BSDs and everything else following the Unix layout
    Other,
}

impl HostOs {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for HostOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::MacOs => write!(f, "macos"),
            Self::Other => write!(f, "unix"),
        }
    }
}

/// Which of the two resource directories is wanted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirKind {
    Config,
    Data,
}

impl DirKind {
    /// Leaf directory name, which is also the archive's top-level segment
    pub fn leaf(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Data => "data",
        }
    }
}

impl std::fmt::Display for DirKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.leaf())
    }
}

/// Resolve the config or data directory of `app_name` for the current host,
/// reading the live process environment.
pub fn app_dir(app_name: &str, kind: DirKind, system: bool, roaming: bool) -> PathBuf {
    resolve_dir(app_name, kind, system, roaming, HostOs::current(), &ProcessEnv)
}

/// Resolve the config or data directory of `app_name`.
///
/// The result is `base / name / leaf`, where `base` depends on the host and
/// on the scope, `name` follows the host's naming convention and `leaf` is
/// `config` or `data`. Unset environment variables resolve to empty strings,
/// which yields a relative but usable path.
pub fn resolve_dir(
    app_name: &str,
    kind: DirKind,
    system: bool,
    roaming: bool,
    host: HostOs,
    env: &dyn Environment,
) -> PathBuf {
    let app_name = app_name.strip_prefix('.').unwrap_or(app_name);

    let base = if system {
        system_base(kind, host, env)
    } else {
        user_base(host, roaming, env)
    };

    base.join(conventional_name(app_name, system, host))
        .join(kind.leaf())
}

fn system_base(kind: DirKind, host: HostOs, env: &dyn Environment) -> PathBuf {
    match (host, kind) {
        (HostOs::Windows, _) => PathBuf::from(env.var("PROGRAMFILES")),
        (HostOs::MacOs, _) => Path::new("/Library").join("Application Support"),
        (HostOs::Other, DirKind::Config) => Path::new("/etc").join("opt"),
        (HostOs::Other, DirKind::Data) => PathBuf::from("/opt"),
    }
}

// Config and data share the same per-user base on every host.
fn user_base(host: HostOs, roaming: bool, env: &dyn Environment) -> PathBuf {
    match host {
        HostOs::Windows => windows_app_data(roaming, env),
        HostOs::MacOs => env.home_dir().join("Library").join("Application Support"),
        HostOs::Other => env.home_dir(),
    }
}

fn windows_app_data(roaming: bool, env: &dyn Environment) -> PathBuf {
    let local = env.var("LOCALAPPDATA");
    if roaming || local.is_empty() {
        PathBuf::from(env.var("APPDATA"))
    } else {
        PathBuf::from(local)
    }
}

/// Apply the host's casing convention, plus the hidden-directory dot for
/// per-user directories on Unix-like hosts.
fn conventional_name(app_name: &str, system: bool, host: HostOs) -> String {
    let mut chars = app_name.chars();
    let Some(first) = chars.next() else {
        return match (host, system) {
            (HostOs::Other, false) => ".".to_string(),
            _ => String::new(),
        };
    };
    let rest = chars.as_str();

    match host {
        HostOs::Windows | HostOs::MacOs => first.to_uppercase().chain(rest.chars()).collect(),
        HostOs::Other => {
            let lowered: String = first.to_lowercase().chain(rest.chars()).collect();
            if system {
                lowered
            } else {
                format!(".{}", lowered)
            }
        }
    }
}
