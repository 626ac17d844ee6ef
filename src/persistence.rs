//! Persistence gateway - loading and saving the serialized panel tree
//!
//! The wire format is JSON: `{"version": 1, "layout": <root container>}`.
//! Failures are reported to the caller; they never touch the in-memory tree.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::model::Container;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid layout document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported layout document version {0}")]
    UnsupportedVersion(u32),
}

/// Versioned envelope around the root container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Schema version for forward compatibility
    #[serde(default)]
    pub version: u32,
    pub layout: Container,
}

impl LayoutDocument {
    pub const CURRENT_VERSION: u32 = 1;
}

/// Serialize a root container into the wire format
pub fn to_json(layout: &Container) -> Result<String, PersistError> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        version: u32,
        layout: &'a Container,
    }
    let doc = Borrowed {
        version: LayoutDocument::CURRENT_VERSION,
        layout,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse the wire format back into a root container
pub fn from_json(content: &str) -> Result<Container, PersistError> {
    let doc: LayoutDocument = serde_json::from_str(content)?;
    if doc.version > LayoutDocument::CURRENT_VERSION {
        return Err(PersistError::UnsupportedVersion(doc.version));
    }
    Ok(doc.layout)
}

/// Where the session's tree is loaded from and saved to
pub trait LayoutGateway: Send + Sync {
    /// The stored tree, or `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<Container>, PersistError>;

    fn save(&self, layout: &Container) -> Result<(), PersistError>;
}

// ============================================================================
// File Gateway
// ============================================================================

/// Stores the tree as a JSON file
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Gateway for `~/.config/dashboard-layout/layout.json`
    pub fn default_location() -> Result<Self, PersistError> {
        crate::config_paths::layout_file()
            .map(Self::new)
            .ok_or(PersistError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        static NEXT_TEMP: AtomicUsize = AtomicUsize::new(0);
        let seq = NEXT_TEMP.fetch_add(1, Ordering::Relaxed);
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "layout.json".to_string());
        self.path
            .with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), seq))
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl LayoutGateway for FileGateway {
    fn load(&self) -> Result<Option<Container>, PersistError> {
        if !self.path.exists() {
            tracing::debug!("No saved layout at {}", self.path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let layout = from_json(&content)?;
        tracing::info!("Loaded layout from {}", self.path.display());
        Ok(Some(layout))
    }

    fn save(&self, layout: &Container) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let content = to_json(layout)?;

        // Atomic replace via a sibling temp file, unique per write
        let tmp = self.temp_path();
        std::fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::info!("Saved layout to {}", self.path.display());
        Ok(())
    }
}

// ============================================================================
// Memory Gateway
// ============================================================================

/// Keeps the tree in memory; counts saves
#[derive(Debug, Default)]
pub struct MemoryGateway {
    stored: Mutex<Option<Container>>,
    saves: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: Container) -> Self {
        Self {
            stored: Mutex::new(Some(layout)),
            saves: AtomicUsize::new(0),
        }
    }

    /// The last saved (or preloaded) tree
    pub fn stored(&self) -> Option<Container> {
        self.stored.lock().ok().and_then(|s| s.clone())
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl LayoutGateway for MemoryGateway {
    fn load(&self) -> Result<Option<Container>, PersistError> {
        Ok(self.stored())
    }

    fn save(&self, layout: &Container) -> Result<(), PersistError> {
        if let Ok(mut stored) = self.stored.lock() {
            *stored = Some(layout.clone());
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
