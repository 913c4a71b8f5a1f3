//! Decoded packet containers. Field values are owned copies, so a decoded
//! packet outlives the input buffer it came from.

use crate::error::Error;
use crate::schema::DataType;
use crate::value::Value;
use std::collections::HashMap;

/// A bitfield value with its named flags extracted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBitfield {
    pub raw_value: u64,
    pub flags: HashMap<String, bool>,
}

impl DecodedBitfield {
    /// True if the named flag exists and is set.
    pub fn is_set(&self, flag_name: &str) -> bool {
        self.flags.get(flag_name).copied().unwrap_or(false)
    }

    /// True if bit `bit` of the raw value is set.
    pub fn bit_at(&self, bit: u8) -> bool {
        bit < 64 && (self.raw_value >> bit) & 1 == 1
    }
}

/// A single decoded field: raw and scaled values plus presentation info.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub name: String,
    pub data_type: DataType,
    /// Value as read off the wire (strings keep their NUL padding).
    pub raw_value: Value,
    /// Value after scaling; equals `raw_value` when no scaling applied.
    pub scaled_value: Value,
    pub unit: String,
    pub bitfield: Option<DecodedBitfield>,
}

impl DecodedField {
    /// The display value: scaled when scaling was applied, raw otherwise.
    pub fn value(&self) -> &Value {
        &self.scaled_value
    }

    /// True if scaling changed the value.
    pub fn has_scaling(&self) -> bool {
        self.raw_value != self.scaled_value
    }

    /// String content for display, trailing NUL padding stripped.
    pub fn display_text(&self) -> Option<&str> {
        self.raw_value.as_str().map(|s| s.trim_end_matches('\0'))
    }
}

/// A fully decoded packet: fields in declaration order with name lookup.
#[derive(Debug, Default)]
pub struct DecodedPacket {
    id: u32,
    name: String,
    fields: Vec<DecodedField>,
    index: HashMap<String, usize>,
    errors: Vec<Error>,
}

impl DecodedPacket {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        DecodedPacket {
            id,
            name: name.into(),
            fields: Vec::new(),
            index: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_field(&mut self, field: DecodedField) {
        self.index.insert(field.name.clone(), self.fields.len());
        self.fields.push(field);
    }

    pub(crate) fn add_error(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn field(&self, name: &str) -> Option<&DecodedField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn field_at(&self, index: usize) -> Option<&DecodedField> {
        self.fields.get(index)
    }

    pub fn fields(&self) -> &[DecodedField] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Errors recorded while decoding with `stop_on_error` disabled.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// The display value of a field (scaled if scaling applied).
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.field(name).map(DecodedField::value)
    }

    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.value(name)?.as_u64()
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.value(name)?.as_i64()
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.value(name)?.as_f64()
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.value(name)?.as_str()
    }

    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        self.value(name)?.as_bytes()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodedField> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a DecodedPacket {
    type Item = &'a DecodedField;
    type IntoIter = std::slice::Iter<'a, DecodedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
