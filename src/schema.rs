//! Schema model: packets, fields, bit flags, scaling, and constraints, plus
//! id/name lookup. Schemas are built once (by the loader or the builder) and
//! treated as immutable afterwards.

use crate::endian::ByteOrder;
use std::collections::HashMap;

/// Field data types. Multi-byte widths are fixed; bitfields, strings, and
/// byte arrays take their width from the field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Width given by `Field::bit_count` (1..=64 bits).
    Bitfield,
    /// Width given by `Field::string_size`.
    String,
    /// Width given by `Field::array_size`.
    Bytes,
}

impl DataType {
    /// Fixed byte width; 0 for types whose width comes from the field.
    pub fn size(self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => 8,
            DataType::Bitfield | DataType::String | DataType::Bytes => 0,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_float(self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// The type's surface-grammar spelling.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::UInt8 => "uint8",
            DataType::UInt16 => "uint16",
            DataType::UInt32 => "uint32",
            DataType::UInt64 => "uint64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Bitfield => "bitfield",
            DataType::String => "string",
            DataType::Bytes => "bytes",
        }
    }
}

/// Affine map from raw integers to physical quantities:
/// `scaled = raw * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaling {
    pub scale: f64,
    pub offset: f64,
}

impl Default for Scaling {
    fn default() -> Self {
        Scaling {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

impl Scaling {
    pub fn apply(&self, raw: i64) -> f64 {
        raw as f64 * self.scale + self.offset
    }

    /// Inverse map, truncating toward zero.
    pub fn remove(&self, real: f64) -> i64 {
        ((real - self.offset) / self.scale) as i64
    }
}

/// Declarative bounds on a field's post-scaling value, plus an optional
/// enumeration of admissible raw integers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub valid_values: Option<Vec<i64>>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.valid_values.is_none()
    }
}

/// A single named bit within a bitfield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitFlag {
    pub bit: u8,
    pub name: String,
    pub description: String,
}

/// Definition of a single field in a packet.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub array_size: Option<usize>,
    pub string_size: Option<usize>,
    pub bit_count: Option<u8>,
    pub scaling: Option<Scaling>,
    pub unit: Option<String>,
    pub description: String,
    pub bit_flags: Vec<BitFlag>,
    pub constraints: Constraints,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Field {
            name: name.into(),
            data_type,
            array_size: None,
            string_size: None,
            bit_count: None,
            scaling: None,
            unit: None,
            description: String::new(),
            bit_flags: Vec::new(),
            constraints: Constraints::default(),
        }
    }

    /// Bytes this field occupies on the wire. Bitfields round up to whole
    /// bytes.
    pub fn byte_size(&self) -> usize {
        match self.data_type {
            DataType::String => self.string_size.unwrap_or(0),
            DataType::Bytes => self.array_size.unwrap_or(0),
            DataType::Bitfield => self
                .bit_count
                .map(|bits| (bits as usize + 7) / 8)
                .unwrap_or(0),
            other => other.size(),
        }
    }

    pub fn is_fixed_size(&self) -> bool {
        match self.data_type {
            DataType::String => self.string_size.is_some(),
            DataType::Bytes => self.array_size.is_some(),
            DataType::Bitfield => self.bit_count.is_some(),
            _ => true,
        }
    }

    pub fn is_bitfield(&self) -> bool {
        self.data_type == DataType::Bitfield || !self.bit_flags.is_empty()
    }

    pub fn has_scaling(&self) -> bool {
        self.scaling.is_some()
    }
}

/// Definition of a packet: an identified record of fields decoded in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Packet {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub fields: Vec<Field>,
}

impl Packet {
    /// Sum of field byte sizes.
    pub fn total_size(&self) -> usize {
        self.fields.iter().map(Field::byte_size).sum()
    }

    pub fn is_fixed_size(&self) -> bool {
        self.fields.iter().all(Field::is_fixed_size)
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Schema metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// A complete schema: metadata, declared byte order, and packets indexed by
/// id and by name.
#[derive(Debug, Clone)]
pub struct Schema {
    info: SchemaInfo,
    byte_order: ByteOrder,
    packets: Vec<Packet>,
    id_index: HashMap<u32, usize>,
    name_index: HashMap<String, usize>,
}

impl Default for Schema {
    fn default() -> Self {
        Schema {
            info: SchemaInfo::default(),
            byte_order: ByteOrder::Big,
            packets: Vec::new(),
            id_index: HashMap::new(),
            name_index: HashMap::new(),
        }
    }
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_info(&mut self, info: SchemaInfo) {
        self.info = info;
    }

    pub fn info(&self) -> &SchemaInfo {
        &self.info
    }

    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Append a packet, updating both indices. Duplicate ids or names are
    /// tolerated here (last insertion wins in the index) and rejected by
    /// [`Schema::validate`].
    pub fn add_packet(&mut self, packet: Packet) {
        let id = packet.id;
        let name = packet.name.clone();
        self.packets.push(packet);
        self.id_index.insert(id, self.packets.len() - 1);
        self.name_index.insert(name, self.packets.len() - 1);
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn packet_count(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn find_packet_by_id(&self, id: u32) -> Option<&Packet> {
        self.id_index.get(&id).map(|&i| &self.packets[i])
    }

    pub fn find_packet_by_name(&self, name: &str) -> Option<&Packet> {
        self.name_index.get(name).map(|&i| &self.packets[i])
    }

    /// Check schema integrity: unique ids, unique names, and at least one
    /// field per packet. Loader-produced schemas always pass.
    pub fn validate(&self) -> Result<(), String> {
        if self.id_index.len() != self.packets.len() {
            return Err("duplicate packet ids detected".to_string());
        }
        if self.name_index.len() != self.packets.len() {
            return Err("duplicate packet names detected".to_string());
        }
        for packet in &self.packets {
            if packet.fields.is_empty() {
                return Err(format!("packet '{}' has no fields", packet.name));
            }
        }
        Ok(())
    }
}
