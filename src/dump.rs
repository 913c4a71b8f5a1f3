//! Render decoded packets as text. Presentation only: trailing NUL padding
//! is stripped from strings here, never in the decoded values themselves.

use crate::decoded::{DecodedField, DecodedPacket};
use crate::value::Value;
use std::fmt::Write;

/// Multi-line text rendering of a decoded packet.
pub fn format_packet(packet: &DecodedPacket) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "packet '{}' (id {}), {} field(s)",
        packet.name(),
        packet.id(),
        packet.field_count()
    );
    for field in packet.fields() {
        let _ = writeln!(out, "  {}", format_field(field));
    }
    for error in packet.errors() {
        let _ = writeln!(out, "  ! {}", error);
    }
    out
}

/// One-line rendering of a decoded field.
pub fn format_field(field: &DecodedField) -> String {
    if let Some(bitfield) = &field.bitfield {
        let mut set: Vec<&str> = bitfield
            .flags
            .iter()
            .filter(|(_, &on)| on)
            .map(|(name, _)| name.as_str())
            .collect();
        set.sort_unstable();
        return format!(
            "{} = 0x{:x} [{}]",
            field.name,
            bitfield.raw_value,
            set.join(" ")
        );
    }
    if let Some(text) = field.display_text() {
        return format!("{} = \"{}\"", field.name, text);
    }
    if field.has_scaling() {
        let scaled = format_value(field.value());
        let raw = format_value(&field.raw_value);
        if field.unit.is_empty() {
            format!("{} = {} (raw {})", field.name, scaled, raw)
        } else {
            format!("{} = {} {} (raw {})", field.name, scaled, field.unit, raw)
        }
    } else if field.unit.is_empty() {
        format!("{} = {}", field.name, format_value(field.value()))
    } else {
        format!(
            "{} = {} {}",
            field.name,
            format_value(field.value()),
            field.unit
        )
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Empty => "-".to_string(),
        Value::I64(x) => x.to_string(),
        Value::U64(x) => x.to_string(),
        Value::F64(x) => x.to_string(),
        Value::Str(s) => format!("\"{}\"", s.trim_end_matches('\0')),
        Value::Bytes(b) => hex_string(b),
    }
}

fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
