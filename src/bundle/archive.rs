//! Resource directory to compressed tar stream

use crate::utils::error::{BundleError, Result};
use flate2::{write::GzEncoder, Compression};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Archive every regular file under `root` into `writer` as a gzip
/// compressed tar stream, then hand the writer back.
///
/// Entry paths are relative to `root` and use `/` separators. Directories are
/// walked but not archived. Siblings are visited in file name order so the
/// same tree always produces the same entry order.
pub fn write_archive<W: Write>(root: &Path, writer: W, level: u32) -> Result<W> {
    let encoder = GzEncoder::new(writer, Compression::new(level.min(9)));
    let mut builder = tar::Builder::new(encoder);

    let walk = WalkDir::new(root)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));

    for entry in walk {
        let entry = entry?;

        if entry.file_type().is_dir() {
            info!("Processing directory {}", entry.path().display());
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = entry.path().strip_prefix(root).map_err(|_| {
            BundleError::ConfigError(format!(
                "{} is not under {}",
                entry.path().display(),
                root.display()
            ))
        })?;
        let name = archive_name(rel_path);

        info!("Archiving bundle file {}", name.display());
        append_file(&mut builder, entry.path(), &name)?;
    }

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

fn append_file<W: Write>(builder: &mut tar::Builder<W>, path: &Path, name: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| BundleError::fs(path, e))?;
    let size = file.metadata().map_err(|e| BundleError::fs(path, e))?.len();

    let mut header = tar::Header::new_gnu();
    header.set_size(size);
    header.set_mode(0o644);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_mtime(0);
    header.set_cksum();

    builder
        .append_data(&mut header, name, &mut file)
        .map_err(|e| BundleError::fs(path, e))
}

// Names keep their raw bytes; tar writes them with '/' separators.
fn archive_name(rel_path: &Path) -> PathBuf {
    rel_path.components().map(|c| c.as_os_str()).collect()
}
