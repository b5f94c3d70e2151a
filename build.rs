//! Compiles the agent's protobuf schema into Rust types and gRPC stubs.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use the bundled protoc so builds don't depend on a system install
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/ping.proto"], &["proto"])?;

    Ok(())
}
