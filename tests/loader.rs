//! Schema loader tests: both surface syntaxes, format detection, defaults,
//! and the first-problem error reporting of the lowering pass.

use wireschema::{
    ByteOrder, DataType, Error, SchemaFormat, SchemaLoader,
};

const YAML_SCHEMA: &str = r#"
schema:
  name: "TestSchema"
  version: "1.0"
  byte_order: "big"

packets:
  - id: 1
    name: "TestPacket"
    fields:
      - name: "value"
        type: "uint32"
      - name: "temp"
        type: "int16"
        scale: 0.01
        offset: -40.0
        unit: "celsius"
"#;

const JSON_SCHEMA: &str = r#"{
  "schema": {
    "name": "TestSchema",
    "version": "1.0",
    "byte_order": "little"
  },
  "packets": [
    {
      "id": 2,
      "name": "JsonPacket",
      "fields": [
        { "name": "counter", "type": "uint16" },
        { "name": "flags", "type": "bitfield", "bits": 8, "flags": [
          { "bit": 0, "name": "active" },
          { "bit": 3, "name": "fault", "description": "hardware fault latch" }
        ]}
      ]
    }
  ]
}"#;

#[test]
fn load_yaml_schema() {
    let schema = SchemaLoader::from_yaml(YAML_SCHEMA).expect("load");

    assert_eq!(schema.info().name, "TestSchema");
    assert_eq!(schema.info().version, "1.0");
    assert_eq!(schema.byte_order(), ByteOrder::Big);
    assert_eq!(schema.packet_count(), 1);

    let packet = schema.find_packet_by_id(1).expect("packet");
    assert_eq!(packet.name, "TestPacket");
    assert_eq!(packet.fields.len(), 2);

    let temp = packet.find_field("temp").expect("temp field");
    let scaling = temp.scaling.expect("scaling");
    assert!((scaling.scale - 0.01).abs() < 1e-9);
    assert!((scaling.offset - -40.0).abs() < 1e-9);
    assert_eq!(temp.unit.as_deref(), Some("celsius"));
}

#[test]
fn load_json_schema() {
    let schema = SchemaLoader::from_json(JSON_SCHEMA).expect("load");

    assert_eq!(schema.byte_order(), ByteOrder::Little);
    let packet = schema.find_packet_by_name("JsonPacket").expect("packet");
    assert_eq!(packet.id, 2);

    let flags = packet.find_field("flags").expect("flags field");
    assert_eq!(flags.data_type, DataType::Bitfield);
    assert_eq!(flags.bit_count, Some(8));
    assert_eq!(flags.bit_flags.len(), 2);
    assert_eq!(flags.bit_flags[1].name, "fault");
    assert_eq!(flags.bit_flags[1].description, "hardware fault latch");
    assert!(flags.is_bitfield());
}

#[test]
fn json_and_yaml_load_equal_schemas() {
    let json = r#"{
      "schema": { "name": "S", "version": "2.1", "byte_order": "big" },
      "packets": [
        { "id": 10, "name": "P", "description": "demo",
          "fields": [
            { "name": "x", "type": "uint16", "min": 0.0, "max": 100.0 },
            { "name": "tag", "type": "string", "size": 8 },
            { "name": "blob", "type": "bytes", "size": 3 }
          ] }
      ]
    }"#;
    let yaml = r#"
schema:
  name: "S"
  version: "2.1"
  byte_order: "big"
packets:
  - id: 10
    name: "P"
    description: "demo"
    fields:
      - name: "x"
        type: "uint16"
        min: 0.0
        max: 100.0
      - name: "tag"
        type: "string"
        size: 8
      - name: "blob"
        type: "bytes"
        size: 3
"#;

    let from_json = SchemaLoader::from_string(json, SchemaFormat::Auto).expect("json");
    let from_yaml = SchemaLoader::from_string(yaml, SchemaFormat::Auto).expect("yaml");

    assert_eq!(from_json.info(), from_yaml.info());
    assert_eq!(from_json.byte_order(), from_yaml.byte_order());
    assert_eq!(from_json.packets(), from_yaml.packets());
}

#[test]
fn auto_detection_picks_syntax_from_first_byte() {
    assert_eq!(wireschema::loader::detect_format("  {\"a\": 1}"), SchemaFormat::Json);
    assert_eq!(wireschema::loader::detect_format("\n[1, 2]"), SchemaFormat::Json);
    assert_eq!(wireschema::loader::detect_format("schema:\n"), SchemaFormat::Yaml);
    assert_eq!(wireschema::loader::detect_format(""), SchemaFormat::Yaml);

    // The JSON text must also load through Auto.
    let schema = SchemaLoader::from_string(JSON_SCHEMA, SchemaFormat::Auto).expect("auto json");
    assert_eq!(schema.byte_order(), ByteOrder::Little);
}

#[test]
fn byte_order_defaults_to_big_when_absent() {
    let yaml = r#"
packets:
  - id: 1
    name: "P"
    fields:
      - name: "x"
        type: "uint8"
"#;
    let schema = SchemaLoader::from_yaml(yaml).expect("load");
    assert_eq!(schema.byte_order(), ByteOrder::Big);
}

#[test]
fn empty_byte_order_string_means_native() {
    let yaml = r#"
schema:
  byte_order: ""
packets:
  - id: 1
    name: "P"
    fields:
      - name: "x"
        type: "uint8"
"#;
    let schema = SchemaLoader::from_yaml(yaml).expect("load");
    assert_eq!(schema.byte_order(), ByteOrder::Native);
}

#[test]
fn byte_order_aliases() {
    for (spelling, expected) in [
        ("be", ByteOrder::Big),
        ("big_endian", ByteOrder::Big),
        ("le", ByteOrder::Little),
        ("little_endian", ByteOrder::Little),
        ("native", ByteOrder::Native),
    ] {
        let yaml = format!(
            "schema:\n  byte_order: \"{spelling}\"\npackets:\n  - id: 1\n    name: \"P\"\n    fields:\n      - name: \"x\"\n        type: \"uint8\"\n"
        );
        let schema = SchemaLoader::from_yaml(&yaml).expect("load");
        assert_eq!(schema.byte_order(), expected, "spelling {spelling}");
    }
}

#[test]
fn unknown_byte_order_fails() {
    let yaml = r#"
schema:
  byte_order: "middle"
packets:
  - id: 1
    name: "P"
    fields:
      - name: "x"
        type: "uint8"
"#;
    let err = SchemaLoader::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("unknown byte order")));
}

#[test]
fn unknown_type_string_fails() {
    let yaml = r#"
packets:
  - id: 1
    name: "P"
    fields:
      - name: "x"
        type: "uint128"
"#;
    let err = SchemaLoader::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("unknown data type")));
}

#[test]
fn missing_packets_fails() {
    let err = SchemaLoader::from_yaml("schema:\n  name: \"S\"\n").unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("no packets")));
}

#[test]
fn missing_required_keys_fail() {
    let no_id = r#"
packets:
  - name: "P"
    fields:
      - name: "x"
        type: "uint8"
"#;
    let err = SchemaLoader::from_yaml(no_id).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("missing 'id'")));

    let no_field_name = r#"
packets:
  - id: 1
    name: "P"
    fields:
      - type: "uint8"
"#;
    let err = SchemaLoader::from_yaml(no_field_name).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("missing 'name'")));

    let no_field_type = r#"
packets:
  - id: 1
    name: "P"
    fields:
      - name: "x"
"#;
    let err = SchemaLoader::from_yaml(no_field_type).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("missing 'type'")));
}

#[test]
fn duplicate_ids_and_names_fail() {
    let dup_ids = r#"
packets:
  - id: 1
    name: "A"
    fields: [ { name: "x", type: "uint8" } ]
  - id: 1
    name: "B"
    fields: [ { name: "x", type: "uint8" } ]
"#;
    let err = SchemaLoader::from_yaml(dup_ids).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("duplicate packet ids")));

    let dup_names = r#"
packets:
  - id: 1
    name: "A"
    fields: [ { name: "x", type: "uint8" } ]
  - id: 2
    name: "A"
    fields: [ { name: "x", type: "uint8" } ]
"#;
    let err = SchemaLoader::from_yaml(dup_names).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("duplicate packet names")));
}

#[test]
fn empty_field_list_fails() {
    let yaml = r#"
packets:
  - id: 1
    name: "P"
    fields: []
"#;
    let err = SchemaLoader::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("has no fields")));
}

#[test]
fn bitfield_requires_bits_in_range() {
    let missing = r#"
packets:
  - id: 1
    name: "P"
    fields: [ { name: "f", type: "bitfield" } ]
"#;
    let err = SchemaLoader::from_yaml(missing).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("missing 'bits'")));

    let zero = r#"
packets:
  - id: 1
    name: "P"
    fields: [ { name: "f", type: "bitfield", bits: 0 } ]
"#;
    let err = SchemaLoader::from_yaml(zero).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("1..=64")));
}

#[test]
fn flag_bit_must_fit_the_bitfield() {
    let yaml = r#"
packets:
  - id: 1
    name: "P"
    fields:
      - name: "f"
        type: "bitfield"
        bits: 8
        flags:
          - bit: 8
            name: "out_of_range"
"#;
    let err = SchemaLoader::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("outside")));
}

#[test]
fn string_and_bytes_require_size() {
    let yaml = r#"
packets:
  - id: 1
    name: "P"
    fields: [ { name: "s", type: "string" } ]
"#;
    let err = SchemaLoader::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("missing 'size'")));
}

#[test]
fn size_rejected_on_numeric_fields() {
    let yaml = r#"
packets:
  - id: 1
    name: "P"
    fields: [ { name: "x", type: "uint16", size: 4 } ]
"#;
    let err = SchemaLoader::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, Error::Schema(ref m) if m.contains("'size' only applies")));
}

#[test]
fn scale_alone_implies_zero_offset() {
    let yaml = r#"
packets:
  - id: 1
    name: "P"
    fields: [ { name: "v", type: "uint16", scale: 0.001 } ]
"#;
    let schema = SchemaLoader::from_yaml(yaml).expect("load");
    let field = schema.find_packet_by_id(1).unwrap().find_field("v").unwrap();
    let scaling = field.scaling.expect("scaling");
    assert!((scaling.scale - 0.001).abs() < 1e-12);
    assert_eq!(scaling.offset, 0.0);
}

#[test]
fn valid_values_are_parsed() {
    let yaml = r#"
packets:
  - id: 1
    name: "P"
    fields:
      - name: "mode"
        type: "uint8"
        valid_values: [0, 1, 4]
"#;
    let schema = SchemaLoader::from_yaml(yaml).expect("load");
    let field = schema.find_packet_by_id(1).unwrap().find_field("mode").unwrap();
    assert_eq!(field.constraints.valid_values.as_deref(), Some(&[0i64, 1, 4][..]));
}

#[test]
fn malformed_text_is_a_parse_error_naming_the_source() {
    let err = SchemaLoader::from_json("{ not json").unwrap_err();
    match err {
        Error::Parse { source_desc, message } => {
            assert_eq!(source_desc, "string");
            assert!(message.contains("JSON parse error"));
        }
        other => panic!("expected Parse, got {other:?}"),
    }

    let err = SchemaLoader::from_yaml("packets: [unclosed").unwrap_err();
    assert!(matches!(err, Error::Parse { ref message, .. } if message.contains("YAML parse error")));
}

#[test]
fn load_from_file_names_the_path_in_errors() {
    let dir = std::env::temp_dir();
    let path = dir.join("wireschema_loader_test.yaml");
    std::fs::write(&path, YAML_SCHEMA).expect("write temp schema");

    let schema = SchemaLoader::from_file(&path, SchemaFormat::Auto).expect("load file");
    assert_eq!(schema.info().name, "TestSchema");
    std::fs::remove_file(&path).ok();

    let missing = dir.join("wireschema_no_such_file.yaml");
    let err = SchemaLoader::from_file(&missing, SchemaFormat::Auto).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().contains("wireschema_no_such_file"));
}

#[test]
fn loaded_schema_passes_validation() {
    let schema = SchemaLoader::from_json(JSON_SCHEMA).expect("load");
    assert!(schema.validate().is_ok());
}
