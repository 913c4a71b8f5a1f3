//! Benchmark: decode a telemetry-style packet (integers, scaled channels,
//! a bitfield, and a fixed tag string) from a prebuilt wire image.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wireschema::{ByteOrder, ByteWriter, DecodeOptions, Decoder, SchemaBuilder};

fn telemetry_schema() -> wireschema::Schema {
    SchemaBuilder::new()
        .name("bench")
        .big_endian()
        .packet(1, "telemetry")
        .uint32("timestamp")
        .int16("temperature")
        .scaled(0.01, -40.0)
        .unit("C")
        .uint16("voltage")
        .scale(0.001)
        .unit("V")
        .bitfield("status", 8)
        .flag(0, "power")
        .flag(1, "link")
        .flag(7, "fault")
        .string("tag", 8)
        .float32("accel")
        .build()
        .expect("bench schema")
}

fn telemetry_bytes() -> Vec<u8> {
    let mut writer = ByteWriter::new();
    writer.write_u32(0x0012_D687, ByteOrder::Big);
    writer.write_i16(5000, ByteOrder::Big);
    writer.write_u16(3300, ByteOrder::Big);
    writer.write_u8(0x03);
    writer.write_string("node-7", 8);
    writer.write_f32(9.81, ByteOrder::Big);
    writer.into_vec()
}

fn bench_decode(c: &mut Criterion) {
    let schema = telemetry_schema();
    let data = telemetry_bytes();

    let decoder = Decoder::new(&schema);
    c.bench_function("decode_telemetry", |b| {
        b.iter(|| decoder.decode(1, black_box(&data)).unwrap())
    });

    let raw = Decoder::with_options(
        &schema,
        DecodeOptions {
            apply_scaling: false,
            validate_constraints: false,
            stop_on_error: true,
        },
    );
    c.bench_function("decode_telemetry_raw", |b| {
        b.iter(|| raw.decode(1, black_box(&data)).unwrap())
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
