//! Build script for Eventify Core
//!
//! Compiles the Protocol Buffer definitions with tonic-build to generate
//! the gRPC event service.

use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let proto_file = "proto/eventify.proto";

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .build_transport(true)
        .out_dir(&out_dir)
        .compile(&[proto_file], &["proto/"])?;

    println!("cargo:rerun-if-changed={}", proto_file);
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=migrations");

    Ok(())
}
