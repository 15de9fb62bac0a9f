use sdui_protocol::AssetSource;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension appended to logical asset names
pub const ASSET_EXTENSION: &str = "json";

/// Loads `<dir>/<name>.json` from disk
///
/// Read failures are logged and reported as absence.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `name`, or `None` when the name could escape the root
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        let valid = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        valid.then(|| self.root.join(format!("{name}.{ASSET_EXTENSION}")))
    }
}

impl AssetSource for DirAssetSource {
    fn load(&self, name: &str) -> Option<String> {
        let Some(path) = self.path_for(name) else {
            log::warn!("rejecting asset name {name:?}");
            return None;
        };
        match fs::read_to_string(&path) {
            Ok(text) => {
                log::debug!("loaded {} ({} bytes)", path.display(), text.len());
                Some(text)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("asset {name:?} not found at {}", path.display());
                None
            }
            Err(err) => {
                log::warn!("failed to read {}: {err}", path.display());
                None
            }
        }
    }
}
