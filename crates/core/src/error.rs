//! Error types for the flag codec compiler.
//!
//! Errors fall into three failure domains with different propagation rules:
//! - Configuration: fatal at compile time, no codec is ever produced
//! - Field range: returned to the caller of `encode`
//! - Decode mismatch: returned to the caller of `decode`, meaning "no usable
//!   message this turn"

use thiserror::Error;

/// Top-level error type for all operations in the system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The registry or the computed layout cannot form a valid codec
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A field value does not fit the width its command declares
    #[error("field range error: {0}")]
    FieldRange(#[from] FieldRangeError),

    /// Bit packing failed
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// A raw value matches no declared header class
    #[error("decode mismatch: {value:#x} matches no command header")]
    DecodeMismatch { value: u64 },

    /// Lookup by name found no command
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Formatting emitted source failed
    #[error("emit error: {0}")]
    Emit(#[from] std::fmt::Error),
}

/// Compile-time failures. Any of these aborts compilation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Registry has no commands
    #[error("registry is empty")]
    EmptyRegistry,

    /// Total bit budget outside `1..=64`
    #[error("total bits {0} outside supported range 1..=64")]
    InvalidTotalBits(u32),

    /// Command name is not a plain identifier
    #[error("command name {0:?} is not a valid identifier")]
    InvalidName(String),

    /// Two commands share a name (or map to the same emitted identifier)
    #[error("duplicate command name {0:?}")]
    DuplicateCommand(String),

    /// Payload alone does not fit the budget
    #[error("command {command} needs {payload_bits} payload bits, budget is {total_bits}")]
    PayloadExceedsBudget {
        command: String,
        payload_bits: u32,
        total_bits: u32,
    },

    /// No header code of the required length is left
    #[error("header code space exhausted at command {command} (header length {header_len})")]
    CodeSpaceExhausted { command: String, header_len: u32 },

    /// Two commands can both claim the same raw value
    #[error("header collision between {first} and {second}")]
    HeaderCollision { first: String, second: String },

    /// A supplied mask has bits above the budget
    #[error("mask {mask:#x} does not fit in {total_bits} bits")]
    MaskOutOfRange { mask: u64, total_bits: u32 },

    /// The emission target cannot represent the word width
    #[error("target {target} cannot represent {total_bits}-bit values")]
    UnsupportedTarget { target: &'static str, total_bits: u32 },
}

/// Encode-time failures caused by the caller's field values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldRangeError {
    /// Value has bits above the declared width
    #[error("{command} field {field}: value {value} does not fit in {width} bits")]
    OutOfRange {
        command: String,
        field: usize,
        value: u64,
        width: u32,
    },

    /// Wrong number of field values
    #[error("{command} takes {expected} fields, got {actual}")]
    WrongArity {
        command: String,
        expected: usize,
        actual: usize,
    },
}

/// Bit-level packing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitIoError {
    /// Value has bits set above the requested width
    #[error("value {value:#x} wider than {width} bits")]
    ValueTooWide { value: u64, width: u32 },

    /// Attempted to write or read past the 64-bit word
    #[error("insufficient bits: requested {requested}, available {available}")]
    InsufficientBits { requested: u32, available: u32 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
