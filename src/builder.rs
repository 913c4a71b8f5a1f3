//! Fluent builder for constructing schemas programmatically, mainly for
//! tests and embedded defaults where no schema text exists.
//!
//! Misuse (configuring a field before any packet exists, flags on a
//! non-bitfield) is remembered and reported by [`SchemaBuilder::build`]
//! instead of panicking mid-chain.

use crate::endian::ByteOrder;
use crate::error::Error;
use crate::schema::{BitFlag, DataType, Field, Packet, Scaling, Schema, SchemaInfo};

#[derive(Debug)]
pub struct SchemaBuilder {
    info: SchemaInfo,
    byte_order: ByteOrder,
    packets: Vec<Packet>,
    current: Option<Packet>,
    /// First misuse encountered while chaining.
    error: Option<String>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        SchemaBuilder {
            info: SchemaInfo::default(),
            byte_order: ByteOrder::Big,
            packets: Vec::new(),
            current: None,
            error: None,
        }
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.info.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.info.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    pub fn big_endian(self) -> Self {
        self.byte_order(ByteOrder::Big)
    }

    pub fn little_endian(self) -> Self {
        self.byte_order(ByteOrder::Little)
    }

    /// Start a new packet; the previous one (if any) is finished.
    pub fn packet(mut self, id: u32, name: impl Into<String>) -> Self {
        self.finish_packet();
        self.current = Some(Packet {
            id,
            name: name.into(),
            description: String::new(),
            fields: Vec::new(),
        });
        self
    }

    pub fn packet_description(mut self, description: impl Into<String>) -> Self {
        match self.current.as_mut() {
            Some(packet) => packet.description = description.into(),
            None => self.fail("packet_description() called before packet()"),
        }
        self
    }

    pub fn field(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        match self.current.as_mut() {
            Some(packet) => packet.fields.push(Field::new(name, data_type)),
            None => self.fail("field() called before packet()"),
        }
        self
    }

    pub fn int8(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::Int8)
    }

    pub fn int16(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::Int16)
    }

    pub fn int32(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::Int32)
    }

    pub fn int64(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::Int64)
    }

    pub fn uint8(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::UInt8)
    }

    pub fn uint16(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::UInt16)
    }

    pub fn uint32(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::UInt32)
    }

    pub fn uint64(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::UInt64)
    }

    pub fn float32(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::Float32)
    }

    pub fn float64(self, name: impl Into<String>) -> Self {
        self.field(name, DataType::Float64)
    }

    /// Add a bitfield of `bits` (1..=64) bits.
    pub fn bitfield(mut self, name: impl Into<String>, bits: u8) -> Self {
        self = self.field(name, DataType::Bitfield);
        if let Some(field) = self.last_field() {
            field.bit_count = Some(bits);
        }
        self
    }

    /// Name a bit of the last bitfield.
    pub fn flag(mut self, bit: u8, name: impl Into<String>) -> Self {
        let flag = BitFlag {
            bit,
            name: name.into(),
            description: String::new(),
        };
        match self.last_field() {
            Some(field) if field.data_type == DataType::Bitfield => field.bit_flags.push(flag),
            Some(_) => self.fail("flag() called on a non-bitfield field"),
            None => self.fail("flag() called before any field"),
        }
        self
    }

    /// Add a fixed-size string field.
    pub fn string(mut self, name: impl Into<String>, size: usize) -> Self {
        self = self.field(name, DataType::String);
        if let Some(field) = self.last_field() {
            field.string_size = Some(size);
        }
        self
    }

    /// Add a fixed-size byte array field.
    pub fn bytes(mut self, name: impl Into<String>, size: usize) -> Self {
        self = self.field(name, DataType::Bytes);
        if let Some(field) = self.last_field() {
            field.array_size = Some(size);
        }
        self
    }

    pub fn scaled(mut self, scale: f64, offset: f64) -> Self {
        match self.last_field() {
            Some(field) => field.scaling = Some(Scaling { scale, offset }),
            None => self.fail("scaled() called before any field"),
        }
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        match self.last_field() {
            Some(field) => {
                let offset = field.scaling.map(|s| s.offset).unwrap_or(0.0);
                field.scaling = Some(Scaling { scale, offset });
            }
            None => self.fail("scale() called before any field"),
        }
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        match self.last_field() {
            Some(field) => {
                let scale = field.scaling.map(|s| s.scale).unwrap_or(1.0);
                field.scaling = Some(Scaling { scale, offset });
            }
            None => self.fail("offset() called before any field"),
        }
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        match self.last_field() {
            Some(field) => field.unit = Some(unit.into()),
            None => self.fail("unit() called before any field"),
        }
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        match self.last_field() {
            Some(field) => field.description = description.into(),
            None => self.fail("describe() called before any field"),
        }
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        match self.last_field() {
            Some(field) => field.constraints.min = Some(min),
            None => self.fail("min() called before any field"),
        }
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        match self.last_field() {
            Some(field) => field.constraints.max = Some(max),
            None => self.fail("max() called before any field"),
        }
        self
    }

    pub fn valid_values(mut self, values: &[i64]) -> Self {
        match self.last_field() {
            Some(field) => field.constraints.valid_values = Some(values.to_vec()),
            None => self.fail("valid_values() called before any field"),
        }
        self
    }

    /// Finish and validate the schema.
    pub fn build(mut self) -> Result<Schema, Error> {
        self.finish_packet();
        if let Some(message) = self.error {
            return Err(Error::Schema(message));
        }
        let mut schema = Schema::new();
        schema.set_info(self.info);
        schema.set_byte_order(self.byte_order);
        for packet in self.packets {
            schema.add_packet(packet);
        }
        schema.validate().map_err(Error::Schema)?;
        Ok(schema)
    }

    fn finish_packet(&mut self) {
        if let Some(packet) = self.current.take() {
            self.packets.push(packet);
        }
    }

    fn last_field(&mut self) -> Option<&mut Field> {
        self.current.as_mut().and_then(|p| p.fields.last_mut())
    }

    fn fail(&mut self, message: &str) {
        if self.error.is_none() {
            self.error = Some(message.to_string());
        }
    }
}
