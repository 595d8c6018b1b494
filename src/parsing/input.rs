//! Loading input files into memory.
//!
//! Files are read whole. Names ending in `.gz` or `.bgz` are decompressed.

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::parsing::ParseError;
use crate::utils::validation::{clean_sample_name, MAX_DECOMPRESSED_SIZE};

/// A fully-read input file and the sample name derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: Option<PathBuf>,
    /// File name without directories
    pub file_name: String,
    /// Cleaned sample name
    pub sample_name: String,
    pub content: String,
}

impl InputFile {
    /// Read a file from disk
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be read or decompressed,
    /// `ParseError::DecompressedTooLarge` past [`MAX_DECOMPRESSED_SIZE`], or
    /// `ParseError::InvalidFormat` if the content is not UTF-8.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = std::fs::read(path)?;
        let content = decode_content(&file_name, &bytes)?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            sample_name: clean_sample_name(&file_name),
            file_name,
            content,
        })
    }

    /// Build an input from content already in memory (e.g. an upload)
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if decompression fails,
    /// `ParseError::DecompressedTooLarge` past [`MAX_DECOMPRESSED_SIZE`], or
    /// `ParseError::InvalidFormat` if the content is not UTF-8.
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Result<Self, ParseError> {
        let file_name = file_name.into();
        let content = decode_content(&file_name, bytes)?;
        Ok(Self {
            path: None,
            sample_name: clean_sample_name(&file_name),
            file_name,
            content,
        })
    }

    pub fn from_text(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            path: None,
            sample_name: clean_sample_name(&file_name),
            file_name,
            content: content.into(),
        }
    }

    /// File name with the final extension (after decompression suffixes) removed
    #[must_use]
    pub fn stem(&self) -> &str {
        let name = strip_compression_suffix(&self.file_name);
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }
}

#[allow(clippy::case_sensitive_file_extension_comparisons)] // lowercased first
fn is_gzipped(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".gz") || lower.ends_with(".bgz")
}

fn strip_compression_suffix(file_name: &str) -> &str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".bgz") {
        &file_name[..file_name.len() - 4]
    } else if lower.ends_with(".gz") {
        &file_name[..file_name.len() - 3]
    } else {
        file_name
    }
}

fn decode_content(file_name: &str, bytes: &[u8]) -> Result<String, ParseError> {
    decode_with_limit(file_name, bytes, MAX_DECOMPRESSED_SIZE)
}

fn decode_with_limit(file_name: &str, bytes: &[u8], limit: u64) -> Result<String, ParseError> {
    let raw = if is_gzipped(file_name) {
        let mut decoded = Vec::new();
        MultiGzDecoder::new(bytes)
            .take(limit.saturating_add(1))
            .read_to_end(&mut decoded)?;
        if decoded.len() as u64 > limit {
            return Err(ParseError::DecompressedTooLarge {
                file: file_name.to_string(),
                limit,
            });
        }
        decoded
    } else {
        bytes.to_vec()
    };

    String::from_utf8(raw)
        .map_err(|_| ParseError::InvalidFormat(format!("{file_name} is not valid UTF-8 text")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_path_plain() {
        let mut file = NamedTempFile::with_suffix(".coords").unwrap();
        writeln!(file, "0 10 | 0 10").unwrap();

        let input = InputFile::from_path(file.path()).unwrap();
        assert_eq!(input.content, "0 10 | 0 10\n");
        assert!(input.file_name.ends_with(".coords"));
        assert!(!input.sample_name.ends_with(".coords"));
    }

    #[test]
    fn test_from_path_gzipped() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"1 5\n2 7\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut file = NamedTempFile::with_suffix(".histo.gz").unwrap();
        file.write_all(&compressed).unwrap();

        let input = InputFile::from_path(file.path()).unwrap();
        assert_eq!(input.content, "1 5\n2 7\n");
    }

    #[test]
    fn test_decompression_is_capped() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&[b'0'; 4096]).unwrap();
        let compressed = encoder.finish().unwrap();

        let decoded = decode_with_limit("a.histo.gz", &compressed, 4096).unwrap();
        assert_eq!(decoded.len(), 4096);

        let result = decode_with_limit("a.histo.gz", &compressed, 4095);
        assert!(matches!(
            result,
            Err(ParseError::DecompressedTooLarge { limit: 4095, .. })
        ));

        // The cap applies to decompressed bytes only
        assert!(decode_with_limit("a.histo", &[b'0'; 4096], 10).is_ok());
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let result = InputFile::from_bytes("bad.txt", &[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_stem() {
        let input = InputFile::from_text("canu_assembly.fplot", "");
        assert_eq!(input.stem(), "canu_assembly");

        let input = InputFile::from_text("reads.dump.gz", "");
        assert_eq!(input.stem(), "reads");

        let input = InputFile::from_text("noext", "");
        assert_eq!(input.stem(), "noext");
    }
}
