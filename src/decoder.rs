//! Decode raw bytes into structured packets: walk a packet definition,
//! drive the reader, apply scaling, and enforce constraints.

use crate::decoded::{DecodedBitfield, DecodedField, DecodedPacket};
use crate::endian::ByteOrder;
use crate::error::{Error, PacketRef};
use crate::reader::{ByteReader, ReadError};
use crate::schema::{DataType, Field, Schema};
use crate::value::Value;
use std::collections::HashMap;

/// Knobs for decoding behavior.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Apply scaling to numeric values (default: true).
    pub apply_scaling: bool,
    /// Check min/max/valid_values after decoding (default: true).
    pub validate_constraints: bool,
    /// Abort on the first field error instead of recording it and
    /// continuing with the next field (default: true).
    pub stop_on_error: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            apply_scaling: true,
            validate_constraints: true,
            stop_on_error: true,
        }
    }
}

/// Stateless decoder borrowing a schema. A schema may be shared by any
/// number of decoders; each decode call owns its reader.
#[derive(Debug)]
pub struct Decoder<'s> {
    schema: &'s Schema,
    options: DecodeOptions,
}

impl<'s> Decoder<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Decoder {
            schema,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(schema: &'s Schema, options: DecodeOptions) -> Self {
        Decoder { schema, options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: DecodeOptions) {
        self.options = options;
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Decode a packet by id. Leftover bytes after the last field are
    /// permitted and ignored.
    pub fn decode(&self, packet_id: u32, data: &[u8]) -> Result<DecodedPacket, Error> {
        let mut reader = ByteReader::new(data);
        self.decode_into(packet_id, &mut reader)
    }

    /// Decode a packet by name.
    pub fn decode_by_name(&self, packet_name: &str, data: &[u8]) -> Result<DecodedPacket, Error> {
        let packet = self
            .schema
            .find_packet_by_name(packet_name)
            .ok_or_else(|| Error::UnknownPacket(PacketRef::Name(packet_name.to_string())))?;
        self.decode(packet.id, data)
    }

    /// Decode from a caller-supplied reader, leaving leftover bytes
    /// observable through `reader.remaining()`.
    pub fn decode_into(
        &self,
        packet_id: u32,
        reader: &mut ByteReader<'_>,
    ) -> Result<DecodedPacket, Error> {
        let def = self
            .schema
            .find_packet_by_id(packet_id)
            .ok_or(Error::UnknownPacket(PacketRef::Id(packet_id)))?;
        let order = self.schema.byte_order();

        let mut packet = DecodedPacket::new(def.id, def.name.clone());
        for field_def in &def.fields {
            let field = match self.decode_field(field_def, reader, order) {
                Ok(field) => field,
                Err(error) => {
                    if self.options.stop_on_error {
                        return Err(error);
                    }
                    packet.add_error(error);
                    continue;
                }
            };
            if self.options.validate_constraints {
                if let Err(error) = check_constraints(field_def, &field) {
                    if self.options.stop_on_error {
                        return Err(error);
                    }
                    // The bytes were consumed and the value is well-formed,
                    // so the field is kept alongside the recorded violation.
                    packet.add_error(error);
                }
            }
            packet.add_field(field);
        }
        Ok(packet)
    }

    fn decode_field(
        &self,
        def: &Field,
        reader: &mut ByteReader<'_>,
        order: ByteOrder,
    ) -> Result<DecodedField, Error> {
        let mut bitfield = None;
        let raw_value = match def.data_type {
            DataType::Int8 => Value::I64(wrap(reader.read_i8(), def)? as i64),
            DataType::Int16 => Value::I64(wrap(reader.read_i16(order), def)? as i64),
            DataType::Int32 => Value::I64(wrap(reader.read_i32(order), def)? as i64),
            DataType::Int64 => Value::I64(wrap(reader.read_i64(order), def)?),
            DataType::UInt8 => Value::U64(wrap(reader.read_u8(), def)? as u64),
            DataType::UInt16 => Value::U64(wrap(reader.read_u16(order), def)? as u64),
            DataType::UInt32 => Value::U64(wrap(reader.read_u32(order), def)? as u64),
            DataType::UInt64 => Value::U64(wrap(reader.read_u64(order), def)?),
            DataType::Float32 => Value::F64(wrap(reader.read_f32(order), def)? as f64),
            DataType::Float64 => Value::F64(wrap(reader.read_f64(order), def)?),
            DataType::Bitfield => {
                // Whole-byte read of the smallest covering width; bitfields
                // are byte-aligned from the start of the packet.
                let bits = def.bit_count.unwrap_or(8);
                if bits == 0 || bits > 64 {
                    // The loader rejects these; only a hand-built field can
                    // get here.
                    return Err(Error::UnsupportedType {
                        field: def.name.clone(),
                    });
                }
                let raw = if bits <= 8 {
                    wrap(reader.read_u8(), def)? as u64
                } else if bits <= 16 {
                    wrap(reader.read_u16(order), def)? as u64
                } else if bits <= 32 {
                    wrap(reader.read_u32(order), def)? as u64
                } else {
                    wrap(reader.read_u64(order), def)?
                };
                bitfield = Some(decode_bitfield(raw, def));
                Value::U64(raw)
            }
            DataType::String => {
                let size = def.string_size.ok_or_else(|| Error::MissingFieldSize {
                    field: def.name.clone(),
                })?;
                Value::Str(wrap(reader.read_string(size), def)?)
            }
            DataType::Bytes => {
                let size = def.array_size.ok_or_else(|| Error::MissingFieldSize {
                    field: def.name.clone(),
                })?;
                Value::Bytes(wrap(reader.read_bytes(size), def)?.to_vec())
            }
        };

        let scaled_value = match (&def.scaling, raw_value.as_f64()) {
            (Some(scaling), Some(raw)) if self.options.apply_scaling => {
                Value::F64(raw * scaling.scale + scaling.offset)
            }
            _ => raw_value.clone(),
        };

        Ok(DecodedField {
            name: def.name.clone(),
            data_type: def.data_type,
            raw_value,
            scaled_value,
            unit: def.unit.clone().unwrap_or_default(),
            bitfield,
        })
    }
}

fn wrap<T>(result: Result<T, ReadError>, def: &Field) -> Result<T, Error> {
    result.map_err(|error| match error {
        ReadError::Underflow {
            needed,
            available,
            position,
        } => Error::Underflow {
            field: def.name.clone(),
            needed,
            available,
            position,
        },
        other => Error::Read {
            field: def.name.clone(),
            reason: other.to_string(),
        },
    })
}

fn decode_bitfield(raw_value: u64, def: &Field) -> DecodedBitfield {
    let mut flags = HashMap::with_capacity(def.bit_flags.len());
    for flag in &def.bit_flags {
        let set = flag.bit < 64 && (raw_value >> flag.bit) & 1 == 1;
        flags.insert(flag.name.clone(), set);
    }
    DecodedBitfield { raw_value, flags }
}

/// Bounds compare the display value (scaled if present); `valid_values`
/// membership is checked against the raw integer. Non-numeric fields are
/// never constraint-checked.
fn check_constraints(def: &Field, field: &DecodedField) -> Result<(), Error> {
    let constraints = &def.constraints;
    if constraints.is_empty() {
        return Ok(());
    }
    let value = match field.value().as_f64() {
        Some(value) => value,
        None => return Ok(()),
    };
    if let Some(min) = constraints.min {
        if value < min {
            return Err(Error::ConstraintViolation {
                field: def.name.clone(),
                value,
                bound: format!("is below minimum {}", min),
            });
        }
    }
    if let Some(max) = constraints.max {
        if value > max {
            return Err(Error::ConstraintViolation {
                field: def.name.clone(),
                value,
                bound: format!("is above maximum {}", max),
            });
        }
    }
    if let Some(allowed) = &constraints.valid_values {
        // Unsigned raws compare against the set reinterpreted as u64, so
        // values above i64::MAX are still checked.
        let membership = match &field.raw_value {
            Value::I64(raw) => Some((allowed.contains(raw), *raw as f64)),
            Value::U64(raw) => Some((allowed.iter().any(|&v| v as u64 == *raw), *raw as f64)),
            _ => None,
        };
        if let Some((in_set, value)) = membership {
            if !in_set {
                return Err(Error::ConstraintViolation {
                    field: def.name.clone(),
                    value,
                    bound: "is not an allowed value".to_string(),
                });
            }
        }
    }
    Ok(())
}
