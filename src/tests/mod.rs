
use crate::config::EngineConfig;
use crate::Engine;
use std::path::PathBuf;

/// An engine reading the catalog shipped in the repository.
pub(crate) fn shipped_engine() -> Engine {
    Engine::new(&EngineConfig {
        catalog_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        ..Default::default()
    })
    .unwrap()
}

/// A fresh scratch directory under the system temp directory.
pub(crate) fn scratch_directory(name: &str) -> PathBuf {
    let directory =
        std::env::temp_dir().join(format!("beicalc-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&directory);
    std::fs::create_dir_all(&directory).unwrap();
    directory
}
