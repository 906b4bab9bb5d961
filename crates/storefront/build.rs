//! Build script for the catalog storefront.
//!
//! Fingerprints the stylesheet so the layout can link a content-addressed
//! URL and the static handler can serve it with a long cache lifetime.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    fingerprint_stylesheet();
}

/// Copy `static/css/catalog.css` to `static/css/derived/catalog.<hash>.css`.
///
/// Exposes the short hash as `CSS_HASH` for `env!("CSS_HASH")`. An empty
/// hash means the stylesheet was missing at build time.
fn fingerprint_stylesheet() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let source = Path::new(&manifest_dir).join("static/css/catalog.css");

    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read catalog.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
            return;
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let short = &digest[..8];

    println!("cargo:rustc-env=CSS_HASH={short}");

    let derived_dir = Path::new(&manifest_dir).join("static/css/derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");
    fs::copy(&source, derived_dir.join(format!("catalog.{short}.css")))
        .expect("Failed to copy fingerprinted stylesheet");
}
