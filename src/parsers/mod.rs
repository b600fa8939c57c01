//! Record readers feeding the extraction pipeline.

pub mod vcf;

pub use vcf::VcfReader;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::types::RawVariantRecord;

/// Everything a reader hands back for one input file
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub records: Vec<RawVariantRecord>,
    pub sample_ids: Vec<String>,
    pub genome_build: Option<String>,
    /// Data lines dropped as malformed
    pub skipped: usize,
}

impl ParseResult {
    pub fn variant_count(&self) -> usize {
        self.records.len()
    }
}

/// Compression detected from leading magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Plain,
    /// gzip and BGZF
    Gzip,
    Bzip2,
    Xz,
}

impl Compression {
    pub fn detect(magic: &[u8]) -> Self {
        if magic.starts_with(&[0x1f, 0x8b]) {
            Compression::Gzip
        } else if magic.starts_with(b"BZh") {
            Compression::Bzip2
        } else if magic.starts_with(&[0xfd, b'7', b'z', b'X', b'Z', 0x00]) {
            Compression::Xz
        } else {
            Compression::Plain
        }
    }
}

/// Wrap `reader` in the decoder its magic bytes call for
pub fn decompress<'a, R: BufRead + 'a>(mut reader: R) -> io::Result<Box<dyn BufRead + 'a>> {
    let compression = Compression::detect(reader.fill_buf()?);
    Ok(match compression {
        Compression::Plain => Box::new(reader),
        Compression::Gzip => Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(reader))),
        Compression::Bzip2 => Box::new(BufReader::new(bzip2::read::MultiBzDecoder::new(reader))),
        Compression::Xz => Box::new(BufReader::new(xz2::read::XzDecoder::new_multi_decoder(
            reader,
        ))),
    })
}

/// Open a possibly compressed text file
pub fn open_file(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    decompress(BufReader::new(file))
}
