//! Packing the resource directory of a Cargo package

use crate::bundle::archive::write_archive;
use crate::bundle::literal::BundleSource;
use crate::config::{BundleSettings, PackageManifest};
use crate::utils::error::{BundleError, Result};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// What happened to one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackResult {
    /// Archive written to this path
    Written(PathBuf),
    /// Library-only package, nothing to embed into
    SkippedLibrary(String),
}

/// Packs resource directories into generated source files
#[derive(Debug, Clone, Default)]
pub struct Packer {
    /// Write the raw `.tar.gz` here instead of the package's `bundle.rs`
    raw_output: Option<PathBuf>,
}

impl Packer {
    pub fn new(raw_output: Option<PathBuf>) -> Self {
        Self { raw_output }
    }

    /// Pack every package directory in `packages`, in order.
    ///
    /// A raw output file can only hold one archive, so it is rejected when
    /// more than one package is given.
    pub fn pack_all(&self, packages: &[PathBuf]) -> Result<Vec<PackResult>> {
        if packages.is_empty() {
            return Err(BundleError::ConfigError("no packages given".to_string()));
        }
        if self.raw_output.is_some() && packages.len() > 1 {
            return Err(BundleError::ConfigError(
                "--file can only be used with a single package".to_string(),
            ));
        }

        packages.iter().map(|dir| self.pack(dir)).collect()
    }

    /// Pack the `bundle` directory of the package at `package_dir`
    pub fn pack(&self, package_dir: &Path) -> Result<PackResult> {
        let manifest = PackageManifest::from_dir(package_dir)?;
        let name = manifest
            .name()
            .ok_or_else(|| {
                BundleError::ConfigError(format!(
                    "{} is a virtual manifest, not a package",
                    package_dir.display()
                ))
            })?
            .to_string();

        if !manifest.is_binary(package_dir) {
            info!("Skipping non-binary package {}", name);
            return Ok(PackResult::SkippedLibrary(name));
        }
        info!("Processing package {}", name);

        let settings = manifest.settings();
        let bundle_dir = package_dir.join(&settings.bundle_dir);
        if !bundle_dir.is_dir() {
            return Err(BundleError::PackageNotFound(format!(
                "{} has no resource directory {}",
                name,
                bundle_dir.display()
            )));
        }

        let output = match &self.raw_output {
            Some(path) => {
                info!("Writing archive {}", path.display());
                write_raw(&bundle_dir, path, &settings)?;
                path.clone()
            }
            None => {
                let path = package_dir.join(&settings.output);
                info!("Writing file {}", path.display());
                write_source(&bundle_dir, &path, &settings)?;
                path
            }
        };

        Ok(PackResult::Written(output))
    }
}

// Output is staged next to its destination and only replaces it once
// complete, so a failed run leaves the previous file in place.
fn create_output(path: &Path) -> Result<BufWriter<NamedTempFile>> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| BundleError::fs(parent, e))?;
            parent
        }
        None => Path::new("."),
    };
    let staged = NamedTempFile::new_in(parent).map_err(|e| BundleError::fs(parent, e))?;
    debug!("Staging {} at {}", path.display(), staged.path().display());
    Ok(BufWriter::new(staged))
}

fn commit_output(out: BufWriter<NamedTempFile>, path: &Path) -> Result<()> {
    let staged = out
        .into_inner()
        .map_err(|e| BundleError::fs(path, e.into_error()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| BundleError::fs(path, e))?;
    }

    staged
        .persist(path)
        .map_err(|e| BundleError::fs(path, e.error))?;
    Ok(())
}

/// Write the archive wrapped in a Rust source file
pub fn write_source(bundle_dir: &Path, output: &Path, settings: &BundleSettings) -> Result<()> {
    let out = create_output(output)?;
    let source = BundleSource::new(out).map_err(|e| BundleError::fs(output, e))?;
    let source = write_archive(bundle_dir, source, settings.compression_level)?;
    let out = source.finish().map_err(|e| BundleError::fs(output, e))?;
    commit_output(out, output)
}

/// Write the bare `.tar.gz` stream, for use with `include_bytes!`
pub fn write_raw(bundle_dir: &Path, output: &Path, settings: &BundleSettings) -> Result<()> {
    let out = create_output(output)?;
    let out = write_archive(bundle_dir, out, settings.compression_level)?;
    commit_output(out, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::literal::{EPILOGUE, PROLOGUE};
    use crate::resources::EmbeddedArchive;
    use std::fs;
    use tempfile::TempDir;

    fn binary_package(root: &Path, name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::write(
            dir.join("Cargo.toml"),
            format!("[package]\nname = \"{}\"\nversion = \"0.1.0\"\n", name),
        )
        .unwrap();
        fs::write(dir.join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::create_dir_all(dir.join("bundle/config")).unwrap();
        fs::write(dir.join("bundle/config/app.ini"), "x = 1\n").unwrap();
        dir
    }

    fn literal_bytes(source: &str) -> Vec<u8> {
        let body = &source[PROLOGUE.len()..source.len() - EPILOGUE.len()];
        body.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| u8::from_str_radix(t.trim_start_matches("0x"), 16).unwrap())
            .collect()
    }

    #[test]
    fn writes_bundle_rs_into_package() {
        let root = TempDir::new().unwrap();
        let pkg = binary_package(root.path(), "demo");

        let result = Packer::default().pack(&pkg).unwrap();

        let output = pkg.join("src/bundle.rs");
        assert_eq!(result, PackResult::Written(output.clone()));
        let source = fs::read_to_string(&output).unwrap();
        let archive = EmbeddedArchive::from_vec(literal_bytes(&source));
        let names: Vec<String> = archive
            .open()
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["config/app.ini".to_string()]);
    }

    #[test]
    fn raw_file_output_is_plain_gzip() {
        let root = TempDir::new().unwrap();
        let pkg = binary_package(root.path(), "demo");
        let out = root.path().join("out/demo.tar.gz");

        Packer::new(Some(out.clone())).pack(&pkg).unwrap();

        let bytes = fs::read(&out).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        assert!(!pkg.join("src/bundle.rs").exists());
    }

    #[test]
    fn library_packages_are_skipped() {
        let root = TempDir::new().unwrap();
        let pkg = binary_package(root.path(), "demo");
        fs::remove_file(pkg.join("src/main.rs")).unwrap();

        let result = Packer::default().pack(&pkg).unwrap();

        assert_eq!(result, PackResult::SkippedLibrary("demo".to_string()));
        assert!(!pkg.join("src/bundle.rs").exists());
    }

    #[test]
    fn metadata_redirects_bundle_dir_and_output() {
        let root = TempDir::new().unwrap();
        let pkg = binary_package(root.path(), "demo");
        fs::rename(pkg.join("bundle"), pkg.join("assets")).unwrap();
        fs::write(
            pkg.join("Cargo.toml"),
            "[package]\nname = \"demo\"\n\n[package.metadata.resbundle]\nbundle_dir = \"assets\"\noutput = \"src/generated/res.rs\"\n",
        )
        .unwrap();

        let result = Packer::default().pack(&pkg).unwrap();

        assert_eq!(result, PackResult::Written(pkg.join("src/generated/res.rs")));
        assert!(pkg.join("src/generated/res.rs").is_file());
    }

    #[test]
    fn missing_bundle_dir_is_an_error() {
        let root = TempDir::new().unwrap();
        let pkg = binary_package(root.path(), "demo");
        fs::remove_dir_all(pkg.join("bundle")).unwrap();

        let err = Packer::default().pack(&pkg).unwrap_err();
        assert!(matches!(err, BundleError::PackageNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn failed_pack_keeps_previous_output() {
        let root = TempDir::new().unwrap();
        let pkg = binary_package(root.path(), "demo");
        let output = pkg.join("src/bundle.rs");
        let raw = root.path().join("out/demo.tar.gz");
        fs::create_dir_all(root.path().join("out")).unwrap();
        fs::write(&output, "// previous bundle\n").unwrap();
        fs::write(&raw, "previous archive").unwrap();
        std::os::unix::fs::symlink(
            root.path().join("nowhere"),
            pkg.join("bundle/config/broken.ini"),
        )
        .unwrap();

        assert!(Packer::default().pack(&pkg).is_err());
        assert!(Packer::new(Some(raw.clone())).pack(&pkg).is_err());

        assert_eq!(fs::read_to_string(&output).unwrap(), "// previous bundle\n");
        assert_eq!(fs::read_to_string(&raw).unwrap(), "previous archive");
        let mut leftovers: Vec<_> = fs::read_dir(pkg.join("src"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        leftovers.sort();
        assert_eq!(leftovers, vec!["bundle.rs", "main.rs"]);
        assert_eq!(fs::read_dir(root.path().join("out")).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn generated_source_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let pkg = binary_package(root.path(), "demo");
        Packer::default().pack(&pkg).unwrap();

        let mode = fs::metadata(pkg.join("src/bundle.rs")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn raw_output_rejects_multiple_packages() {
        let root = TempDir::new().unwrap();
        let a = binary_package(root.path(), "a");
        let b = binary_package(root.path(), "b");

        let err = Packer::new(Some(root.path().join("x.tar.gz")))
            .pack_all(&[a, b])
            .unwrap_err();
        assert!(matches!(err, BundleError::ConfigError(_)));
    }

    #[test]
    fn pack_all_processes_every_package() {
        let root = TempDir::new().unwrap();
        let a = binary_package(root.path(), "a");
        let b = binary_package(root.path(), "b");

        let results = Packer::default().pack_all(&[a.clone(), b.clone()]).unwrap();

        assert_eq!(
            results,
            vec![
                PackResult::Written(a.join("src/bundle.rs")),
                PackResult::Written(b.join("src/bundle.rs")),
            ]
        );
    }
}
