use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/c_api.rs");
    if env::var_os("CARGO_FEATURE_C_API").is_none() {
        return;
    }
    // A missing header must not fail the Rust build.
    if let Err(e) = try_main() {
        println!("cargo:warning=C header not generated: {e}");
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let crate_dir = env::var("CARGO_MANIFEST_DIR")?;
    let include_dir = PathBuf::from(&crate_dir).join("include");
    std::fs::create_dir_all(&include_dir)?;
    let header_path = include_dir.join("draco_api.h");

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_include_guard("DRACO_API_H_")
        .with_language(cbindgen::Language::C)
        .with_autogen_warning("/* GENERATED FILE -- DO NOT EDIT */")
        .with_sys_include("stdbool.h")
        .with_sys_include("stddef.h")
        .with_sys_include("stdint.h")
        .with_cpp_compat(true)
        .generate()?;
    bindings.write_to_file(&header_path);

    println!("cargo:include={}", include_dir.display());
    Ok(())
}
