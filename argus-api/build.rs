use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }
    let proto_file = Path::new("proto").join("inference.proto");
    tonic_build::compile_protos(proto_file).map_err(|e| {
        eprintln!("Failed to compile protos: {}", e);
        e
    })?;
    Ok(())
}
