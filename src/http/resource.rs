use std::fmt;
use std::path::Path;

use crate::config::StaticFilesConfig;
use crate::http::response::StatusCode;

/// Document served for `/` and `/index.html`.
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// Filesystem location of a requested resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath(String);

impl ResourcePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps request targets onto files under a document root.
///
/// The target is appended to the root as-is: no percent-decoding and no
/// `..` containment check. A target such as `/../secret` reaches outside
/// the root.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    root: String,
}

impl ResourceResolver {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(cfg: &StaticFilesConfig) -> Self {
        Self::new(cfg.root.clone())
    }

    /// Builds the resource path for `target` without touching the filesystem.
    pub fn path_for(&self, target: &str) -> ResourcePath {
        let root = self.root.trim_end_matches('/');

        match target {
            "/" | "/index.html" => ResourcePath(format!("{}/{}", root, DEFAULT_DOCUMENT)),
            _ => ResourcePath(format!("{}{}", root, target)),
        }
    }

    /// Resolves `target`, reporting 404 when nothing exists at the path.
    pub async fn resolve(&self, target: &str) -> (StatusCode, ResourcePath) {
        let path = self.path_for(target);

        let exists = tokio::fs::try_exists(path.as_path())
            .await
            .unwrap_or(false);

        let status = if exists {
            StatusCode::Ok
        } else {
            StatusCode::NotFound
        };

        (status, path)
    }
}
