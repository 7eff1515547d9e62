//! Rust source rendering of the compressed archive

use std::io::{self, Write};

/// Start of the generated `bundle.rs`, up to the opening of the byte array
pub const PROLOGUE: &str = "\
// Generated by resbundle from the package's resource directory. Do not edit.

static RESOURCE_BUNDLE: &[u8] = &[";

/// End of the generated `bundle.rs`, after the last byte
pub const EPILOGUE: &str = "
];

/// Compressed resource archive embedded in this binary.
pub fn resource_archive() -> resbundle::EmbeddedArchive {
    resbundle::EmbeddedArchive::from_static(RESOURCE_BUNDLE)
}
";

/// Renders written bytes as the body of a Rust byte-array literal.
///
/// Each byte becomes `0xNN, `. A new tab-indented row starts every 16 bytes,
/// 4-byte groups are separated by three spaces and every 256 bytes get a
/// blank line.
pub struct LiteralWriter<W: Write> {
    inner: W,
    count: usize,
}

impl<W: Write> LiteralWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    /// Bytes rendered so far
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_byte(&mut self, b: u8) -> io::Result<()> {
        if self.count > 0 && self.count % 256 == 0 {
            self.inner.write_all(b"\n")?;
        }
        if self.count % 16 == 0 {
            self.inner.write_all(b"\n\t")?;
        } else if self.count % 4 == 0 {
            self.inner.write_all(b"   ")?;
        }
        write!(self.inner, "0x{:02X}, ", b)?;
        self.count += 1;
        Ok(())
    }
}

impl<W: Write> Write for LiteralWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &b in buf {
            self.write_byte(b)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// A complete generated source file: prologue, literal, epilogue
pub struct BundleSource<W: Write> {
    literal: LiteralWriter<W>,
}

impl<W: Write> BundleSource<W> {
    /// Write the prologue and start the literal
    pub fn new(mut inner: W) -> io::Result<Self> {
        inner.write_all(PROLOGUE.as_bytes())?;
        Ok(Self {
            literal: LiteralWriter::new(inner),
        })
    }

    /// Write the epilogue and return the underlying writer
    pub fn finish(self) -> io::Result<W> {
        let mut inner = self.literal.into_inner();
        inner.write_all(EPILOGUE.as_bytes())?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for BundleSource<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.literal.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.literal.flush()
    }
}
