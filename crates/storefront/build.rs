//! Build script for storefront crate.
//!
//! Fingerprints static assets so they can be served with immutable caching.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let root = Path::new(&manifest_dir);

    fingerprint(root, "css", "main", "css", "CSS_HASH");
    fingerprint(root, "js", "preview", "js", "PREVIEW_JS_HASH");
}

/// Copy `static/{dir}/{stem}.{ext}` to `static/{dir}/derived/{stem}.{hash}.{ext}`
/// and expose the hash as the compile-time variable `var`.
fn fingerprint(root: &Path, dir: &str, stem: &str, ext: &str, var: &str) {
    let source = root.join("static").join(dir).join(format!("{stem}.{ext}"));
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {stem}.{ext}: {e}");
            println!("cargo:rustc-env={var}=");
            return;
        }
    };

    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = &hash[..8];
    println!("cargo:rustc-env={var}={short_hash}");

    let derived_dir = root.join("static").join(dir).join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");
    fs::copy(&source, derived_dir.join(format!("{stem}.{short_hash}.{ext}")))
        .expect("Failed to copy asset to derived directory");
}
