//! Centralized validation and helper functions.

use crate::parsing::ParseError;
use crate::web::format_detection::{matches_kind, InputKind};

/// Maximum number of segments allowed in a single file (DOS protection)
pub const MAX_SEGMENTS: usize = 1_000_000;

/// Maximum number of k-mers a dump may expand to (4 symbols at k=10)
pub const MAX_KMER_SPACE: usize = 1 << 20;

/// Maximum number of plot points one module run may emit
pub const MAX_POINTS: u64 = 10_000_000;

/// Maximum size of a decompressed input (256MB)
pub const MAX_DECOMPRESSED_SIZE: u64 = 256 * 1024 * 1024;

/// Stand-in for a zero denominator when computing percentages
pub const RATIO_EPSILON: f64 = 1e-9;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MIN_FILE_CONTENT_SIZE: usize = 1;

/// Extensions stripped from file names to form sample names
const SAMPLE_NAME_EXTENSIONS: &[&str] = &[
    ".txt", ".tsv", ".csv", ".yaml", ".yml", ".coords", ".fplot", ".rplot", ".histo", ".dump",
    ".jf", ".log", ".sh", ".paf", ".gp",
];

const COMPRESSION_EXTENSIONS: &[&str] = &[".gz", ".bgz"];

/// Check if adding another segment would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new segment.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_segment_limit(segments.len()).is_some() {
///     return Err(...);
/// }
/// segments.push(segment); // Safe to add
/// ```
#[must_use]
pub fn check_segment_limit(count: usize) -> Option<String> {
    if count >= MAX_SEGMENTS {
        Some(format!(
            "Too many segments: adding another would exceed maximum of {MAX_SEGMENTS}"
        ))
    } else {
        None
    }
}

/// Check if emitting `requested` more points after `used` would exceed
/// [`MAX_POINTS`].
///
/// Returns an error message if it would, None if safe to emit.
#[must_use]
pub fn check_point_limit(used: u64, requested: u64) -> Option<String> {
    match used.checked_add(requested) {
        Some(total) if total <= MAX_POINTS => None,
        _ => Some(format!(
            "Too many plot points: {requested} more would exceed maximum of {MAX_POINTS}"
        )),
    }
}

/// Size of the k-mer space `symbols^k`, if within [`MAX_KMER_SPACE`].
///
/// # Errors
///
/// Returns `ParseError::KmerSpaceTooLarge` if the space overflows or exceeds
/// the limit.
pub fn check_kmer_space(symbols: usize, k: usize) -> Result<usize, ParseError> {
    u32::try_from(k)
        .ok()
        .and_then(|exp| symbols.checked_pow(exp))
        .filter(|&total| total <= MAX_KMER_SPACE)
        .ok_or(ParseError::KmerSpaceTooLarge { symbols, k })
}

/// Derive a sample name from a file name by removing compression and known
/// data extensions.
///
/// # Examples
///
/// ```
/// use ab_report::utils::validation::clean_sample_name;
///
/// assert_eq!(clean_sample_name("canu_assembly.coords"), "canu_assembly");
/// assert_eq!(clean_sample_name("reads.dump.gz"), "reads");
/// assert_eq!(clean_sample_name("flye.v2.fasta"), "flye.v2.fasta");
/// ```
#[must_use]
pub fn clean_sample_name(file_name: &str) -> String {
    let mut name = file_name.trim();

    for ext in COMPRESSION_EXTENSIONS {
        if let Some(stripped) = strip_suffix_ignore_case(name, ext) {
            name = stripped;
            break;
        }
    }

    while let Some(stripped) = SAMPLE_NAME_EXTENSIONS
        .iter()
        .find_map(|ext| strip_suffix_ignore_case(name, ext))
    {
        name = stripped;
    }

    if name.is_empty() {
        file_name.to_string()
    } else {
        name.to_string()
    }
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    let tail = name.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &name[..split])
}

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
    #[error("File content appears malformed or invalid")]
    InvalidFileContent,
    #[error("File content does not look like {0}")]
    FormatValidationFailed(&'static str),
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>();

    if sanitized.trim().is_empty() {
        return Err(ValidationError::InvalidFilename);
    }

    // Hidden files only when the name is nothing but a known extension
    if sanitized.starts_with('.') && !has_known_extension(&sanitized) {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

fn has_known_extension(filename: &str) -> bool {
    SAMPLE_NAME_EXTENSIONS
        .iter()
        .chain(COMPRESSION_EXTENSIONS)
        .any(|ext| strip_suffix_ignore_case(filename, ext).is_some())
}

/// Validate that file content is not malicious or malformed
///
/// Basic security checks for file content integrity:
/// - Minimum size requirements
/// - Binary content detection for text formats
/// - Basic malformation checks
///
/// # Errors
///
/// Returns `ValidationError::InvalidFileContent` if the content is too small,
/// contains unexpected binary data for text formats, or fails UTF-8 validation.
pub fn validate_file_content(content: &[u8], expected_text: bool) -> Result<(), ValidationError> {
    if content.len() < MIN_FILE_CONTENT_SIZE {
        return Err(ValidationError::InvalidFileContent);
    }

    if expected_text {
        let non_printable_count = content
            .iter()
            .filter(|&&b| b < 9 || (b > 13 && b < 32) || b == 127)
            .count();

        // Allow up to 5% non-printable characters for text files
        if content.len() > 100 && non_printable_count > content.len() / 20 {
            return Err(ValidationError::InvalidFileContent);
        }

        if std::str::from_utf8(content).is_err() {
            return Err(ValidationError::InvalidFileContent);
        }
    }

    Ok(())
}

/// Validate an uploaded file after decompression
///
/// Performs complete security validation for file uploads:
/// - Filename sanitization and security checks
/// - Text content integrity
/// - Content shape agrees with the input role's kind
///
/// # Errors
///
/// Returns a `ValidationError` if filename validation fails, the content is
/// not text, or it does not look like `expected`.
pub fn validate_upload(
    filename: Option<&str>,
    content: &str,
    expected: InputKind,
) -> Result<Option<String>, ValidationError> {
    let validated_filename = filename.map(validate_filename).transpose()?;

    validate_file_content(content.as_bytes(), true)?;

    if !matches_kind(content, expected) {
        return Err(ValidationError::FormatValidationFailed(expected.display_name()));
    }

    Ok(validated_filename)
}
