//! # wireschema: schema-driven binary packet codec
//!
//! Wire packets are described declaratively (fields, byte order, bit
//! layouts, scaling, constraints) in JSON or YAML; the decoder turns raw
//! byte buffers into structured named values and validates them. One schema
//! is the single source of truth for an on-wire layout, so telemetry and
//! device pipelines need no hand-written parsers.
//!
//! ## Field types
//!
//! - Integers: `int8`..`int64`, `uint8`..`uint64`
//! - IEEE-754 floats: `float32`, `float64`
//! - `bitfield` with named single-bit flags (`bits: 1..64`)
//! - Fixed-size `string` and `bytes` (`size: n`)
//! - Affine scaling (`scale`, `offset`), units, `min`/`max`/`valid_values`
//!   constraints
//!
//! ## Example
//!
//! ```
//! use wireschema::{Decoder, SchemaFormat, SchemaLoader};
//!
//! let schema = SchemaLoader::from_string(
//!     r#"
//! schema:
//!   name: "demo"
//!   byte_order: "big"
//! packets:
//!   - id: 1
//!     name: "status"
//!     fields:
//!       - name: "temperature"
//!         type: "int16"
//!         scale: 0.01
//!         offset: -40.0
//!         unit: "C"
//! "#,
//!     SchemaFormat::Auto,
//! )
//! .unwrap();
//!
//! let decoder = Decoder::new(&schema);
//! let decoded = decoder.decode(1, &[0x13, 0x88]).unwrap();
//! assert_eq!(decoded.get_f64("temperature"), Some(10.0));
//! ```
//!
//! Decoding is a pure transformation: schemas are immutable after loading
//! and may be shared freely; each decode call owns its reader; decoded
//! packets own their values.

pub mod builder;
pub mod decoded;
pub mod decoder;
pub mod dump;
pub mod endian;
pub mod error;
pub mod ir;
pub mod loader;
pub mod reader;
pub mod schema;
pub mod value;
pub mod writer;

pub use builder::SchemaBuilder;
pub use decoded::{DecodedBitfield, DecodedField, DecodedPacket};
pub use decoder::{DecodeOptions, Decoder};
pub use endian::ByteOrder;
pub use error::{Error, PacketRef};
pub use loader::{SchemaFormat, SchemaLoader};
pub use reader::{ByteReader, ReadError};
pub use schema::{BitFlag, Constraints, DataType, Field, Packet, Scaling, Schema, SchemaInfo};
pub use value::Value;
pub use writer::ByteWriter;
