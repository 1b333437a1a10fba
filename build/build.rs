use std::env;
use std::path::{Path, PathBuf};

// Sources of the Swiss Ephemeris needed for planets, houses and ayanamsa.
const SWE_SOURCES: [&str; 9] = [
    "swecl.c",
    "swedate.c",
    "swehel.c",
    "swehouse.c",
    "swejpl.c",
    "swemmoon.c",
    "swemplan.c",
    "sweph.c",
    "swephlib.c",
];

fn main() {
    println!("cargo:rerun-if-changed=build/build.rs");
    println!("cargo:rerun-if-env-changed=SWISSEPH_SRC");
    println!("cargo:rerun-if-env-changed=SWISSEPH_LIB_DIR");

    if env::var_os("CARGO_FEATURE_SWISSEPH").is_none() {
        return;
    }

    match env::var_os("SWISSEPH_SRC") {
        Some(src) => compile_from_source(&PathBuf::from(src)),
        None => link_system_library(),
    }
}

fn compile_from_source(src: &Path) {
    let mut build = cc::Build::new();

    if cfg!(target_os = "windows") {
        build.flag("/W4");
    } else {
        build.flag("-g").flag("-Wall").flag("-fPIC");
    }

    build.include(src);
    for file in SWE_SOURCES {
        let path = src.join(file);
        println!("cargo:rerun-if-changed={}", path.display());
        build.file(path);
    }
    build.compile("swe");

    if !cfg!(target_os = "windows") {
        println!("cargo:rustc-link-lib=m");
    }
}

fn link_system_library() {
    if let Some(dir) = env::var_os("SWISSEPH_LIB_DIR") {
        println!("cargo:rustc-link-search={}", Path::new(&dir).display());
    }
    println!("cargo:rustc-link-lib=swe");
}
