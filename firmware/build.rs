//! This build script copies the `memory.x` file from the crate root into
//! a directory where the linker can always find it at build time.
//! The firmware is a workspace member, so the linker would not find `memory.x` in the
//! crate root on its own. Re-running only when `memory.x` changes keeps builds incremental.

#![allow(clippy::expect_used)]

use std::{env, fs, path::PathBuf};

fn main() {
    memory_x();
}

/// Handle the `memory.x` linker script
fn memory_x() {
    // Put `memory.x` in our output directory and ensure it's
    // on the linker search path.
    let out = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR environment variable not set"));
    fs::write(out.join("memory.x"), include_bytes!("memory.x")).expect("Could not write memory.x");
    println!("cargo:rustc-link-search={}", out.display());

    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
