//! Archive installation into the resolved config/data directories

use crate::config::AppDirConfig;
use crate::paths::DirKind;
use crate::unpack::handler::EntryHandler;
use crate::utils::error::{BundleError, Result};
use std::fs::{DirBuilder, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Where an archive entry goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryClass {
    /// Under the config or data directory, at the given relative path
    Routed(DirKind, PathBuf),
    /// To the entry handler, under its original path
    Unrouted,
}

/// Classify an entry by its first path segment.
///
/// Single-segment paths are always unrouted. Routed remainders must stay
/// inside their directory.
pub fn classify(path: &Path) -> Result<EntryClass> {
    let path = path.strip_prefix(".").unwrap_or(path);
    let mut components = path.components();

    let kind = match components.next() {
        Some(Component::Normal(first)) if first == "config" => DirKind::Config,
        Some(Component::Normal(first)) if first == "data" => DirKind::Data,
        _ => return Ok(EntryClass::Unrouted),
    };

    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        return Ok(EntryClass::Unrouted);
    }
    if !rest.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(BundleError::UnsafeEntryPath(path.display().to_string()));
    }

    Ok(EntryClass::Routed(kind, rest.to_path_buf()))
}

/// Counts from one install pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Files created or overwritten
    pub written: usize,
    /// Files left alone because they already existed
    pub skipped: usize,
    /// Unrouted entries given to the handler
    pub handed_off: usize,
    /// Unrouted entries dropped for lack of a handler
    pub dropped: usize,
}

impl std::fmt::Display for InstallReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} written, {} already present, {} handed off, {} dropped",
            self.written, self.skipped, self.handed_off, self.dropped
        )
    }
}

/// Install every entry of `archive`, in archive order.
///
/// With `force`, existing destination files are truncated and rewritten.
/// Without it they are left untouched. The first error aborts the pass and
/// leaves already written files in place.
pub fn install<R: Read>(
    archive: &mut tar::Archive<R>,
    dirs: &AppDirConfig,
    force: bool,
    mut handler: Option<&mut dyn EntryHandler>,
) -> Result<InstallReport> {
    let mut report = InstallReport::default();

    for entry in archive.entries().map_err(BundleError::ArchiveRead)? {
        let mut entry = entry.map_err(BundleError::ArchiveRead)?;
        let path = entry.path().map_err(BundleError::ArchiveRead)?.into_owned();
        let entry_type = entry.header().entry_type();

        match classify(&path)? {
            EntryClass::Unrouted if entry_type.is_dir() && is_routed_root(&path) => {
                debug!("Skipping directory {}", path.display());
            }
            EntryClass::Unrouted => match handler.as_deref_mut() {
                Some(handler) => {
                    debug!("Handing off {}", path.display());
                    handler
                        .handle(&path, &mut entry)
                        .map_err(|e| BundleError::fs(&path, e))?;
                    report.handed_off += 1;
                }
                None => {
                    debug!("No handler for {}, dropping it", path.display());
                    report.dropped += 1;
                }
            },
            EntryClass::Routed(kind, rest) => {
                if !entry_type.is_file() {
                    debug!("Skipping non-regular entry {}", path.display());
                    continue;
                }

                let dest = dirs.dir(kind).join(rest);
                if write_entry(&mut entry, &dest, force)? {
                    info!("Unpacked {}", dest.display());
                    report.written += 1;
                } else {
                    debug!("{} exists, leaving it", dest.display());
                    report.skipped += 1;
                }
            }
        }
    }

    Ok(report)
}

// Directory headers for the config/data trees themselves carry nothing to
// install or hand off.
fn is_routed_root(path: &Path) -> bool {
    let path = path.strip_prefix(".").unwrap_or(path);
    path == Path::new("config") || path == Path::new("data")
}

/// Write one entry to `dest`. Returns false when no-clobber skipped it.
fn write_entry(content: &mut dyn Read, dest: &Path, force: bool) -> Result<bool> {
    if let Some(parent) = dest.parent() {
        create_dirs(parent).map_err(|e| BundleError::fs(parent, e))?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = match options.open(dest) {
        Ok(file) => file,
        Err(e) if !force && e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(BundleError::fs(dest, e)),
    };

    copy_content(content, &mut file, dest)?;
    Ok(true)
}

fn create_dirs(path: &Path) -> std::io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)
}

// Read failures come from the archive, write failures from the destination.
fn copy_content(content: &mut dyn Read, file: &mut File, dest: &Path) -> Result<u64> {
    let mut buf = [0u8; 8192];
    let mut total = 0u64;

    loop {
        let n = match content.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(BundleError::ArchiveRead(e)),
        };
        file.write_all(&buf[..n])
            .map_err(|e| BundleError::fs(dest, e))?;
        total += n as u64;
    }

    file.flush().map_err(|e| BundleError::fs(dest, e))?;
    Ok(total)
}
