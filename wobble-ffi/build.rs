// Build script that tries to generate a C header with `cbindgen`.
// If `cbindgen` is not available, it falls back to copying the
// checked-in `include/wobble.h` to $OUT_DIR.
//
// Either way, consumers can include the header from:
//   - <repo>/wobble-ffi/include/wobble.h      (checked-in)
//   - $OUT_DIR/wobble.h

use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/wobble.h");

    let (Ok(crate_dir), Ok(out_dir)) = (env::var("CARGO_MANIFEST_DIR"), env::var("OUT_DIR")) else {
        println!("cargo:warning=wobble-ffi: cargo did not provide CARGO_MANIFEST_DIR/OUT_DIR; skipping header");
        return;
    };
    let crate_dir = PathBuf::from(crate_dir);
    let header_repo = crate_dir.join("include").join("wobble.h");
    let header_out = PathBuf::from(out_dir).join("wobble.h");

    let generated = Command::new("cbindgen")
        .arg("--crate")
        .arg("wobble-ffi")
        .arg("--lang")
        .arg("C")
        .arg("--output")
        .arg(&header_out)
        .current_dir(&crate_dir)
        .status()
        .map(|s| s.success())
        .unwrap_or(false);

    if generated {
        println!("cargo:warning=wobble-ffi: generated header with cbindgen -> {}", header_out.display());
        return;
    }

    // Fallback: the checked-in header, or a placeholder if that is missing too.
    let copied = header_repo.exists() && fs::copy(&header_repo, &header_out).is_ok();
    if !copied {
        let placeholder = b"/* wobble.h placeholder: install cbindgen or keep include/wobble.h checked in */\n";
        if let Err(e) = fs::write(&header_out, placeholder) {
            println!("cargo:warning=wobble-ffi: could not write {}: {e}", header_out.display());
        }
    }
}
