//! Unpack policy: decides whether and how to install the embedded archive

use crate::config::AppDirConfig;
use crate::resources::EmbeddedArchive;
use crate::unpack::directive::{UnpackDirective, UnpackMode};
use crate::unpack::handler::EntryHandler;
use crate::unpack::installer::{install, InstallReport};
use crate::utils::error::{BundleError, Result};
use tracing::info;

/// Result of an unpack pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackOutcome {
    /// `suppress`: nothing was looked at
    Suppressed,
    /// `detect`: the config or data directory already exists
    AlreadyPresent,
    /// The archive was installed and the host should carry on
    Unpacked(InstallReport),
    /// `only`: the archive was installed and the host should now exit
    Completed(InstallReport),
}

impl UnpackOutcome {
    /// True when the host process should report success and exit
    pub fn should_exit(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn report(&self) -> Option<&InstallReport> {
        match self {
            Self::Unpacked(report) | Self::Completed(report) => Some(report),
            Self::Suppressed | Self::AlreadyPresent => None,
        }
    }
}

/// Runs the unpack policy against an embedded archive
#[derive(Default)]
pub struct Unpacker<'h> {
    archive: Option<EmbeddedArchive>,
    handler: Option<Box<dyn EntryHandler + 'h>>,
}

impl<'h> Unpacker<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the archive to install
    pub fn archive(mut self, archive: EmbeddedArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Register the handler for entries outside `config/` and `data/`
    pub fn handler(mut self, handler: impl EntryHandler + 'h) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Apply `directive` to the directories in `dirs`.
    ///
    /// `suppress` and `detect` can return before the archive is looked at,
    /// so a missing archive only fails when installing is actually due.
    pub fn run(&mut self, dirs: &AppDirConfig, directive: UnpackDirective) -> Result<UnpackOutcome> {
        match directive.mode {
            UnpackMode::Suppress => return Ok(UnpackOutcome::Suppressed),
            UnpackMode::Detect => {
                if dirs.config_dir().exists() || dirs.data_dir().exists() {
                    info!(
                        "Resource directories already present ({}, {}), not unpacking",
                        dirs.config_dir().display(),
                        dirs.data_dir().display()
                    );
                    return Ok(UnpackOutcome::AlreadyPresent);
                }
            }
            UnpackMode::Unpack | UnpackMode::Only => {}
        }

        let archive = match &self.archive {
            Some(archive) if !archive.is_empty() => archive,
            _ => return Err(BundleError::MissingArchive),
        };

        info!(
            "Unpacking {} resources into {} and {}{}",
            dirs.name(),
            dirs.config_dir().display(),
            dirs.data_dir().display(),
            if directive.force { " (overwriting)" } else { "" }
        );

        let report = install(
            &mut archive.open(),
            dirs,
            directive.force,
            self.handler.as_deref_mut().map(|h| h as &mut dyn EntryHandler),
        )?;

        info!("Unpack finished: {}", report);

        if directive.mode == UnpackMode::Only {
            Ok(UnpackOutcome::Completed(report))
        } else {
            Ok(UnpackOutcome::Unpacked(report))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::write_archive;
    use crate::utils::error::ErrorKind;
    use std::fs;
    use std::io::Read;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        source: PathBuf,
        dirs: AppDirConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            let source = root.path().join("bundle");
            let dirs = AppDirConfig::builder("tool")
                .config_dir(Some(root.path().join("home/.tool/config")))
                .data_dir(Some(root.path().join("home/.tool/data")))
                .build()
                .unwrap();
            Self {
                _root: root,
                source,
                dirs,
            }
        }

        fn put(&self, rel: &str, content: &str) {
            let path = self.source.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn archive(&self) -> EmbeddedArchive {
            let bytes = write_archive(&self.source, Vec::new(), 6).unwrap();
            EmbeddedArchive::from_vec(bytes)
        }

        fn run(&self, directive: &str) -> Result<UnpackOutcome> {
            Unpacker::new()
                .archive(self.archive())
                .run(&self.dirs, directive.parse()?)
        }
    }

    fn read_tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files: Vec<_> = walkdir::WalkDir::new(root)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                (
                    e.path().strip_prefix(root).unwrap().to_path_buf(),
                    fs::read(e.path()).unwrap(),
                )
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn round_trip_reproduces_config_and_data_trees() {
        let fx = Fixture::new();
        fx.put("config/app.ini", "[main]\nname = tool\n");
        fx.put("config/themes/dark.toml", "bg = \"#000\"\n");
        fx.put("data/seed/users.csv", "id,name\n1,kim\n");
        fx.put("data/empty.txt", "");
        fx.put("extra/readme.txt", "not installed");

        let outcome = fx.run("unpack").unwrap();
        assert_eq!(outcome.report().unwrap().written, 4);
        assert_eq!(outcome.report().unwrap().dropped, 1);

        assert_eq!(
            read_tree(fx.dirs.config_dir()),
            read_tree(&fx.source.join("config"))
        );
        assert_eq!(
            read_tree(fx.dirs.data_dir()),
            read_tree(&fx.source.join("data"))
        );
    }

    #[test]
    fn second_run_without_force_overwrites_nothing() {
        let fx = Fixture::new();
        fx.put("config/app.ini", "v1");
        fx.run("unpack").unwrap();

        fs::write(fx.dirs.config_file("app.ini"), "edited").unwrap();
        let outcome = fx.run("unpack").unwrap();

        assert_eq!(outcome.report().unwrap().written, 0);
        assert_eq!(outcome.report().unwrap().skipped, 1);
        assert_eq!(fs::read_to_string(fx.dirs.config_file("app.ini")).unwrap(), "edited");
    }

    #[test]
    fn force_takes_the_latest_archive_content() {
        let fx = Fixture::new();
        fx.put("data/state.json", "{\"version\": 1, \"padding\": true}");
        fx.run("unpack,force").unwrap();

        fx.put("data/state.json", "{\"version\": 2}");
        let outcome = fx.run("unpack,force").unwrap();

        assert_eq!(outcome, UnpackOutcome::Unpacked(InstallReport {
            written: 1,
            ..InstallReport::default()
        }));
        assert_eq!(
            fs::read_to_string(fx.dirs.data_file("state.json")).unwrap(),
            "{\"version\": 2}"
        );
    }

    #[test]
    fn detect_unpacks_when_neither_directory_exists() {
        let fx = Fixture::new();
        fx.put("config/app.ini", "x");

        let outcome = fx.run("detect").unwrap();

        assert!(matches!(outcome, UnpackOutcome::Unpacked(_)));
        assert!(fx.dirs.config_file("app.ini").is_file());
    }

    #[test]
    fn detect_skips_when_either_directory_exists() {
        for existing in ["config", "data"] {
            let fx = Fixture::new();
            fx.put("config/app.ini", "x");
            let dir = if existing == "config" {
                fx.dirs.config_dir()
            } else {
                fx.dirs.data_dir()
            };
            fs::create_dir_all(dir).unwrap();

            let outcome = fx.run("detect").unwrap();

            assert_eq!(outcome, UnpackOutcome::AlreadyPresent, "{existing}");
            assert!(!fx.dirs.config_file("app.ini").exists(), "{existing}");
        }
    }

    #[test]
    fn suppress_touches_nothing() {
        let fx = Fixture::new();
        // No archive registered at all; suppress must not care
        let outcome = Unpacker::new()
            .run(&fx.dirs, "suppress".parse().unwrap())
            .unwrap();
        assert_eq!(outcome, UnpackOutcome::Suppressed);
        assert!(!outcome.should_exit());
        assert!(!fx.dirs.config_dir().exists());
    }

    #[test]
    fn missing_archive_is_a_configuration_error() {
        let fx = Fixture::new();
        let err = Unpacker::new()
            .run(&fx.dirs, "unpack".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, BundleError::MissingArchive));
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = Unpacker::new()
            .archive(EmbeddedArchive::from_vec(Vec::new()))
            .run(&fx.dirs, "only".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, BundleError::MissingArchive));
        assert!(!fx.dirs.config_dir().exists());
    }

    #[test]
    fn only_force_installs_hands_off_and_completes() {
        let fx = Fixture::new();
        fx.put("config/app.ini", "upstream");
        fx.put("extra/readme.txt", "hello");
        fs::create_dir_all(fx.dirs.config_dir()).unwrap();
        fs::write(fx.dirs.config_file("app.ini"), "stale").unwrap();

        let mut handed = Vec::new();
        let outcome = Unpacker::new()
            .archive(fx.archive())
            .handler(|path: &Path, content: &mut dyn Read| -> std::io::Result<()> {
                let mut text = String::new();
                content.read_to_string(&mut text)?;
                handed.push((path.to_path_buf(), text));
                Ok(())
            })
            .run(&fx.dirs, "only,force".parse().unwrap())
            .unwrap();

        assert!(outcome.should_exit());
        assert_eq!(outcome.report().unwrap().written, 1);
        assert_eq!(outcome.report().unwrap().handed_off, 1);
        assert_eq!(
            fs::read_to_string(fx.dirs.config_file("app.ini")).unwrap(),
            "upstream"
        );
        assert_eq!(
            handed,
            vec![(PathBuf::from("extra/readme.txt"), "hello".to_string())]
        );
        assert!(!fx.dirs.config_file("extra").exists());
        assert!(!fx.dirs.data_file("extra").exists());
    }

    #[test]
    fn malformed_directive_fails_before_filesystem_access() {
        let fx = Fixture::new();
        fx.put("config/app.ini", "x");
        let err = fx.run("force").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!fx.dirs.config_dir().exists());
        assert!(!fx.dirs.data_dir().exists());
    }
}
