//! Error types for `gftext`

use thiserror::Error;

/// The error type for `gftext` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Text File Format Errors ====================
    /// The header declares a section count other than 1.
    #[error("invalid section count: {count} (expected 1)")]
    InvalidSectionCount {
        /// The section count found in the header.
        count: u16,
    },

    /// The header carries a file-level key. Lines are keyed individually;
    /// this field must be zero.
    #[error("invalid initial key: {key:#010X} (expected 0)")]
    InvalidInitialKey {
        /// The key value found in the header.
        key: u32,
    },

    /// The header's data-section offset is not 0x10.
    #[error("invalid data offset: {offset:#X} (expected 0x10)")]
    InvalidDataOffset {
        /// The offset found in the header.
        offset: u32,
    },

    /// Data offset plus total data length does not equal the file length.
    #[error("data length {data_length} does not match file length {file_length}")]
    DataLengthMismatch {
        /// The total data length declared in the header.
        data_length: u32,
        /// The actual file length in bytes.
        file_length: u64,
    },

    /// The section length field disagrees with the total data length.
    #[error("section length {section_length} does not match data length {data_length}")]
    SectionLengthMismatch {
        /// The section length declared in the header.
        section_length: u32,
        /// The total data length declared in the header.
        data_length: u32,
    },

    /// A line record points outside the data section.
    #[error("line {index} data out of bounds: offset {offset}, {units} units")]
    LineOutOfBounds {
        /// The line index.
        index: u16,
        /// The record's offset relative to the data section.
        offset: i32,
        /// The record's length in code units.
        units: u16,
    },

    /// The file has more lines than the 16-bit line count can express.
    #[error("too many lines: {count} (limit 65535)")]
    TooManyLines {
        /// The number of lines in the file.
        count: usize,
    },

    // ==================== AHTB Format Errors ====================
    /// The file is not a valid AHTB table (missing AHTB magic).
    #[error("invalid AHTB magic: expected AHTB, found {0:?}")]
    InvalidAhtbMagic([u8; 4]),

    /// A stored entry hash does not match the hash of its name.
    #[error("hash mismatch for entry '{name}': stored {stored:#018X}, computed {computed:#018X}")]
    HashMismatch {
        /// The entry name as decoded.
        name: String,
        /// The hash stored in the file.
        stored: u64,
        /// The hash recomputed from the name.
        computed: u64,
    },

    // ==================== Grammar Errors ====================
    /// A `[` variable span has no closing `]`.
    #[error("variable text is not capped properly: {text}")]
    UnterminatedVariable {
        /// The line text being encoded.
        text: String,
    },

    /// A `{` ruby span has no closing `}`.
    #[error("ruby text is not capped properly: {text}")]
    UnterminatedRuby {
        /// The line text being encoded.
        text: String,
    },

    /// A variable span is missing its command/argument separator.
    #[error("incorrectly formatted variable text: {text}")]
    MalformedVariable {
        /// The bracket body that failed to parse.
        text: String,
    },

    /// The variable command is not one of `~`, `WAIT`, or `VAR`.
    #[error("unknown variable method: {text}")]
    UnknownVariableMethod {
        /// The bracket body with the unknown command.
        text: String,
    },

    /// A ruby span is missing its `|` separator.
    #[error("incorrectly formatted ruby text: {text}")]
    MalformedRuby {
        /// The brace body that failed to parse.
        text: String,
    },

    /// The two base-text spans of a ruby annotation differ in length.
    #[error("ruby base text length mismatch: '{base1}' vs '{base2}'")]
    RubyLengthMismatch {
        /// The first base-text span.
        base1: String,
        /// The third (duplicate) base-text span.
        base2: String,
    },

    /// An escape sequence other than `\n \\ \[ \{ \r \c`.
    #[error("invalid escape sequence: \\{escape}")]
    InvalidEscape {
        /// The escaped character.
        escape: char,
    },

    /// A variable argument is not a 16-bit hexadecimal value.
    #[error("invalid hex value: {value}")]
    InvalidHexArgument {
        /// The argument text that failed to parse.
        value: String,
    },

    /// A `WAIT` or `~` argument is not a 16-bit decimal value.
    #[error("invalid decimal value: {value}")]
    InvalidDecimalArgument {
        /// The argument text that failed to parse.
        value: String,
    },

    /// Line data ended in the middle of a variable payload.
    #[error("unexpected end of line data")]
    UnexpectedEndOfLine,

    // ==================== Variable Resolution Errors ====================
    /// A variable name has no table entry and is not a hexadecimal code.
    #[error("variable parse error: {name}. Expected a hexadecimal value or standard variable code")]
    UnknownVariable {
        /// The unresolvable variable name.
        name: String,
    },

    // ==================== Table Import Errors ====================
    /// A table row does not have the expected columns. Row order determines
    /// line indices and therefore cipher keys, so bad rows cannot be skipped.
    #[error("malformed table row {row}")]
    MalformedTableRow {
        /// The 1-based row number in the table file.
        row: usize,
    },

    /// A table row's flags column is not a 16-bit hexadecimal value.
    #[error("invalid flags value '{value}' in table row {row}")]
    InvalidFlags {
        /// The flags text that failed to parse.
        value: String,
        /// The 1-based row number in the table file.
        row: usize,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// Unexpected end of file.
    #[error("unexpected end of file")]
    UnexpectedEof,

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

/// Coarse error category, for callers that branch on failure class rather
/// than individual variants (e.g. batch reporting).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// IO or filesystem failure.
    Io,
    /// Structurally corrupt or foreign binary input.
    Format,
    /// Malformed human-authored text.
    Grammar,
    /// A variable name that resolves to nothing.
    VariableResolution,
    /// Anything else (JSON, UTF-8, table rows).
    Other,
}

impl Error {
    /// The coarse category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::InvalidSectionCount { .. }
            | Error::InvalidInitialKey { .. }
            | Error::InvalidDataOffset { .. }
            | Error::DataLengthMismatch { .. }
            | Error::SectionLengthMismatch { .. }
            | Error::LineOutOfBounds { .. }
            | Error::TooManyLines { .. }
            | Error::InvalidAhtbMagic(_)
            | Error::HashMismatch { .. }
            | Error::UnexpectedEof => ErrorKind::Format,
            Error::UnterminatedVariable { .. }
            | Error::UnterminatedRuby { .. }
            | Error::MalformedVariable { .. }
            | Error::UnknownVariableMethod { .. }
            | Error::MalformedRuby { .. }
            | Error::RubyLengthMismatch { .. }
            | Error::InvalidEscape { .. }
            | Error::InvalidHexArgument { .. }
            | Error::InvalidDecimalArgument { .. }
            | Error::UnexpectedEndOfLine => ErrorKind::Grammar,
            Error::UnknownVariable { .. } => ErrorKind::VariableResolution,
            _ => ErrorKind::Other,
        }
    }
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `gftext` operations.
pub type Result<T> = std::result::Result<T, Error>;
