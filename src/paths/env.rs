//! Environment lookups used by the directory resolver

use std::path::PathBuf;

/// Source of environment variables and the current user's home directory.
///
/// Lookups happen at resolution time. Missing values read as empty.
pub trait Environment {
    /// Value of an environment variable, or an empty string when unset.
    fn var(&self, key: &str) -> String;

    /// Home directory of the current user, or an empty path when unknown.
    fn home_dir(&self) -> PathBuf;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> String {
        std::env::var(key).unwrap_or_default()
    }

    fn home_dir(&self) -> PathBuf {
        // The user database wins over $HOME
        if let Some(home) = user_db_home() {
            if !home.as_os_str().is_empty() {
                return home;
            }
        }
        PathBuf::from(self.var("HOME"))
    }
}

#[cfg(unix)]
fn user_db_home() -> Option<PathBuf> {
    use nix::unistd::{getuid, User};

    match User::from_uid(getuid()) {
        Ok(Some(user)) => Some(user.dir),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!("Current user lookup failed: {}", e);
            None
        }
    }
}

#[cfg(not(unix))]
fn user_db_home() -> Option<PathBuf> {
    None
}
