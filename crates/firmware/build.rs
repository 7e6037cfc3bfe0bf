//! Link configuration for the embedded target.
//!
//! Host builds (tests) skip everything; for `thumbv6m-none-eabi` the
//! memory layout is handed to the linker and cortex-m-rt link args are set.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // Host test builds have an OS; the firmware target does not
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("none") {
        return;
    }

    let out = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::copy("memory.x", out.join("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
