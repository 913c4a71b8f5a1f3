//! Loader fuzz target: feed arbitrary bytes to the schema loader.
//! The loader must not panic; it returns Ok(Schema) or Err(Error).
//! Build with: cargo fuzz run loader_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let _ = wireschema::SchemaLoader::from_string(s, wireschema::SchemaFormat::Auto);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run loader_fuzz");
}
