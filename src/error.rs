//! Crate-wide error surface. Every fallible operation returns one of these;
//! no panics escape the library on malformed input.

use std::fmt;

/// Identifies a packet by id or by name in error reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketRef {
    Id(u32),
    Name(String),
}

impl fmt::Display for PacketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketRef::Id(id) => write!(f, "id {}", id),
            PacketRef::Name(name) => write!(f, "name '{}'", name),
        }
    }
}

/// Errors from loading schemas and decoding packets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema text was not syntactically valid.
    #[error("failed to parse {source_desc}: {message}")]
    Parse { source_desc: String, message: String },

    /// Lowering to the schema model failed or a schema invariant is violated.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("unknown packet {0}")]
    UnknownPacket(PacketRef),

    /// A field read ran past the end of the input.
    #[error("field '{field}': buffer underflow at position {position}: need {needed} byte(s), have {available}")]
    Underflow {
        field: String,
        needed: usize,
        available: usize,
        position: usize,
    },

    /// Any other reader failure, wrapped with the field being decoded.
    #[error("field '{field}': {reason}")]
    Read { field: String, reason: String },

    #[error("field '{field}' requires a size")]
    MissingFieldSize { field: String },

    /// The loader prevents this; reported defensively if a hand-built field
    /// slips through with an undecodable shape.
    #[error("field '{field}': unsupported data type")]
    UnsupportedType { field: String },

    #[error("field '{field}': value {value} {bound}")]
    ConstraintViolation {
        field: String,
        value: f64,
        bound: String,
    },
}
