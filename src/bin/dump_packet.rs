//! Decode a hex-encoded packet against a schema and print its fields.
//!
//! Usage:
//!   dump_packet --schema schema.yaml --id 1 2a03e8
//!   dump_packet --schema schema.json --name status < payload.hex
//!
//! Options:
//!   --raw          Do not apply scaling
//!   --no-validate  Skip constraint checks
//!   --lenient      Keep decoding past per-field errors
//!
//! The payload is hex (whitespace and a leading 0x are ignored); when no
//! payload argument is given it is read from stdin.

use anyhow::{bail, Context};
use std::io::Read;
use wireschema::{dump, DecodeOptions, Decoder, SchemaFormat, SchemaLoader};

fn parse_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let cleaned: String = text
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.len() % 2 != 0 {
        bail!("hex payload must have an even number of digits");
    }
    let mut bytes = Vec::with_capacity(cleaned.len() / 2);
    for chunk in cleaned.as_bytes().chunks(2) {
        let pair = std::str::from_utf8(chunk)?;
        bytes.push(u8::from_str_radix(pair, 16).with_context(|| format!("bad hex: '{}'", pair))?);
    }
    Ok(bytes)
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == flag) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn take_value(args: &mut Vec<String>, key: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == key)?;
    if pos + 1 >= args.len() {
        return None;
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Some(value)
}

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let raw = take_flag(&mut args, "--raw");
    let no_validate = take_flag(&mut args, "--no-validate");
    let lenient = take_flag(&mut args, "--lenient");
    let schema_path = take_value(&mut args, "--schema")
        .context("missing required --schema <path>")?;
    let packet_id = take_value(&mut args, "--id");
    let packet_name = take_value(&mut args, "--name");

    let payload = if let Some(hex) = args.first() {
        parse_hex(hex)?
    } else {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        parse_hex(&text)?
    };

    let schema = SchemaLoader::from_file(&schema_path, SchemaFormat::Auto)?;
    let options = DecodeOptions {
        apply_scaling: !raw,
        validate_constraints: !no_validate,
        stop_on_error: !lenient,
    };
    let decoder = Decoder::with_options(&schema, options);

    let decoded = match (packet_id, packet_name) {
        (Some(id), None) => {
            let id: u32 = id.parse().context("--id must be a number")?;
            decoder.decode(id, &payload)?
        }
        (None, Some(name)) => decoder.decode_by_name(&name, &payload)?,
        _ => bail!("exactly one of --id <n> or --name <s> is required"),
    };

    print!("{}", dump::format_packet(&decoded));
    Ok(())
}
