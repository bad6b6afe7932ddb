//! Renders the crate README into `OUT_DIR` so `lib.rs` can use it as crate docs.

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=README.md");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let readme = fs::read_to_string(Path::new(&crate_dir).join("README.md")).unwrap_or_default();

    // Module links in the README point at source files; rustdoc wants module paths.
    let rendered = readme.replace("](src/", "](").replace(".rs)", ")");

    let out_dir = env::var("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join("README_GENERATED.md"), rendered).unwrap();
}
