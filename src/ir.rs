//! Intermediate representation between schema text and the schema model.
//!
//! Both surface parsers deserialize into these structs, so the concrete
//! syntax layer stays trivial: `type` and `byte_order` are plain strings and
//! every key is optional. [`lower`] performs all semantic validation in one
//! place, which keeps JSON and YAML from drifting apart.

use crate::endian::ByteOrder;
use crate::error::Error;
use crate::schema::{
    BitFlag, Constraints, DataType, Field, Packet, Scaling, Schema, SchemaInfo,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IrSchema {
    pub schema: IrInfo,
    pub packets: Vec<IrPacket>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IrInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub byte_order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IrPacket {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub description: String,
    pub fields: Vec<IrField>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IrField {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub description: String,
    pub unit: Option<String>,
    pub scale: Option<f64>,
    pub offset: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub bits: Option<u8>,
    pub size: Option<usize>,
    pub flags: Vec<IrFlag>,
    pub valid_values: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IrFlag {
    pub bit: Option<u8>,
    pub name: Option<String>,
    pub description: String,
}

/// Map a surface type string onto the model.
pub fn parse_data_type(type_name: &str) -> Result<DataType, String> {
    match type_name {
        "int8" => Ok(DataType::Int8),
        "int16" => Ok(DataType::Int16),
        "int32" => Ok(DataType::Int32),
        "int64" => Ok(DataType::Int64),
        "uint8" => Ok(DataType::UInt8),
        "uint16" => Ok(DataType::UInt16),
        "uint32" => Ok(DataType::UInt32),
        "uint64" => Ok(DataType::UInt64),
        "float32" => Ok(DataType::Float32),
        "float64" => Ok(DataType::Float64),
        "bitfield" => Ok(DataType::Bitfield),
        "string" => Ok(DataType::String),
        "bytes" => Ok(DataType::Bytes),
        other => Err(format!("unknown data type: '{}'", other)),
    }
}

/// Map a surface byte-order string onto the model. The empty string means
/// host-native; an absent key is handled by [`lower`] and defaults to big.
pub fn parse_byte_order(order: &str) -> Result<ByteOrder, String> {
    match order {
        "" | "native" => Ok(ByteOrder::Native),
        "big" | "be" | "big_endian" => Ok(ByteOrder::Big),
        "little" | "le" | "little_endian" => Ok(ByteOrder::Little),
        other => Err(format!("unknown byte order: '{}'", other)),
    }
}

/// Lower the IR to a validated [`Schema`]. Never returns a partial schema.
pub fn lower(ir: IrSchema) -> Result<Schema, Error> {
    let mut schema = Schema::new();
    schema.set_info(SchemaInfo {
        name: ir.schema.name,
        version: ir.schema.version,
        description: ir.schema.description,
    });
    if let Some(order) = ir.schema.byte_order.as_deref() {
        schema.set_byte_order(parse_byte_order(order).map_err(Error::Schema)?);
    }

    if ir.packets.is_empty() {
        return Err(Error::Schema("schema has no packets".to_string()));
    }
    for ir_packet in ir.packets {
        schema.add_packet(lower_packet(ir_packet)?);
    }

    schema
        .validate()
        .map_err(|message| Error::Schema(format!("schema validation failed: {}", message)))?;
    Ok(schema)
}

fn lower_packet(ir: IrPacket) -> Result<Packet, Error> {
    let id = ir
        .id
        .ok_or_else(|| Error::Schema("packet missing 'id'".to_string()))?;
    let name = ir
        .name
        .ok_or_else(|| Error::Schema(format!("packet {} missing 'name'", id)))?;
    if ir.fields.is_empty() {
        return Err(Error::Schema(format!("packet '{}' has no fields", name)));
    }

    let mut fields = Vec::with_capacity(ir.fields.len());
    for ir_field in ir.fields {
        fields.push(lower_field(ir_field, &name)?);
    }
    Ok(Packet {
        id,
        name,
        description: ir.description,
        fields,
    })
}

fn lower_field(ir: IrField, packet_name: &str) -> Result<Field, Error> {
    let name = ir.name.ok_or_else(|| {
        Error::Schema(format!("packet '{}': field missing 'name'", packet_name))
    })?;
    let type_name = ir
        .type_name
        .ok_or_else(|| Error::Schema(format!("field '{}' missing 'type'", name)))?;
    let data_type = parse_data_type(&type_name).map_err(Error::Schema)?;

    let mut field = Field::new(name, data_type);
    field.description = ir.description;
    field.unit = ir.unit;

    if ir.scale.is_some() || ir.offset.is_some() {
        field.scaling = Some(Scaling {
            scale: ir.scale.unwrap_or(1.0),
            offset: ir.offset.unwrap_or(0.0),
        });
    }

    field.constraints = Constraints {
        min: ir.min,
        max: ir.max,
        valid_values: ir.valid_values,
    };

    match data_type {
        DataType::Bitfield => {
            let bits = ir.bits.ok_or_else(|| {
                Error::Schema(format!("bitfield '{}' missing 'bits'", field.name))
            })?;
            if !(1..=64).contains(&bits) {
                return Err(Error::Schema(format!(
                    "bitfield '{}': 'bits' must be 1..=64, got {}",
                    field.name, bits
                )));
            }
            field.bit_count = Some(bits);
            for ir_flag in ir.flags {
                let flag = lower_flag(ir_flag, &field.name)?;
                if flag.bit >= bits {
                    return Err(Error::Schema(format!(
                        "bitfield '{}': flag '{}' bit {} outside 0..{}",
                        field.name, flag.name, flag.bit, bits
                    )));
                }
                field.bit_flags.push(flag);
            }
        }
        _ if ir.bits.is_some() => {
            return Err(Error::Schema(format!(
                "field '{}': 'bits' only applies to bitfield",
                field.name
            )));
        }
        _ => {}
    }

    match data_type {
        DataType::String => {
            field.string_size = Some(ir.size.ok_or_else(|| {
                Error::Schema(format!("string field '{}' missing 'size'", field.name))
            })?);
        }
        DataType::Bytes => {
            field.array_size = Some(ir.size.ok_or_else(|| {
                Error::Schema(format!("bytes field '{}' missing 'size'", field.name))
            })?);
        }
        _ if ir.size.is_some() => {
            return Err(Error::Schema(format!(
                "field '{}': 'size' only applies to string and bytes",
                field.name
            )));
        }
        _ => {}
    }

    Ok(field)
}

fn lower_flag(ir: IrFlag, field_name: &str) -> Result<BitFlag, Error> {
    let bit = ir.bit.ok_or_else(|| {
        Error::Schema(format!("bitfield '{}': flag missing 'bit'", field_name))
    })?;
    let name = ir.name.ok_or_else(|| {
        Error::Schema(format!("bitfield '{}': flag missing 'name'", field_name))
    })?;
    Ok(BitFlag {
        bit,
        name,
        description: ir.description,
    })
}
