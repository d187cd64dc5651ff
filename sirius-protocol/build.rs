//! Build script for generating Rust code from Protocol Buffers

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Server stubs back the in-process test server
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(&["proto/types.proto", "proto/service.proto"], &["proto"])?;

    Ok(())
}
