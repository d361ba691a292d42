fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/market_cache.proto");
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(&["proto/market_cache.proto"], &["proto"])?;
    Ok(())
}
