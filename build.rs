//! Compiles the PO message catalogs into MO files at build time.

use std::fs;
use std::path::Path;

// Catalog parsing and encoding shared with the application
include!("src/i18n/po.rs");
include!("src/i18n/mo.rs");

fn main() {
    println!("cargo:rerun-if-changed=locales");
    println!("cargo:rerun-if-changed=src/i18n/po.rs");
    println!("cargo:rerun-if-changed=src/i18n/mo.rs");

    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest = Path::new(&out_dir).join("locales");
    fs::create_dir_all(&dest).expect("failed to create locale output directory");

    let sources = Path::new("locales");
    if !sources.is_dir() {
        return;
    }
    for entry in fs::read_dir(sources).expect("failed to read locales directory") {
        let path = entry.expect("failed to read locale entry").path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("po") {
            continue;
        }
        let text = fs::read_to_string(&path)
            .unwrap_or_else(|error| panic!("failed to read {}: {error}", path.display()));
        let catalog = parse_po(&text);
        let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap();
        let target = dest.join(format!("{stem}.mo"));
        fs::write(&target, encode_mo(&catalog))
            .unwrap_or_else(|error| panic!("failed to write {}: {error}", target.display()));
    }
}
