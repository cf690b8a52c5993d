use std::path::PathBuf;

/// Find the project root via the crate root provided by `cargo test`,
/// and get our single static configuration file.
pub fn get_path_from_project_root(deployment_path: impl AsRef<std::path::Path>) -> PathBuf {
    let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("../../../");
    d.push(deployment_path);
    d
}
