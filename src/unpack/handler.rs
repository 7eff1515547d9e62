//! Extension point for archive entries outside `config/` and `data/`

use std::io::Read;
use std::path::Path;

/// Receives every archive entry whose top-level segment is neither
/// `config` nor `data`.
///
/// `path` is the entry's full path inside the archive, `content` streams its
/// bytes. Unread content is skipped by the installer. An error aborts the
/// unpack pass.
///
/// Directory entries are forwarded too, with empty content. Only the
/// directory headers of `config/` and `data/` themselves are withheld.
pub trait EntryHandler {
    fn handle(&mut self, path: &Path, content: &mut dyn Read) -> std::io::Result<()>;
}

impl<F> EntryHandler for F
where
    F: FnMut(&Path, &mut dyn Read) -> std::io::Result<()>,
{
    fn handle(&mut self, path: &Path, content: &mut dyn Read) -> std::io::Result<()> {
        self(path, content)
    }
}
