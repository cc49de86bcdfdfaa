use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

/// URL prefix under which stored images are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

const MAX_NAME_LEN: usize = 64;

/// Manages on-disk storage for listing images.
///
/// Each image is a flat file at `{dir}/{uuid}_{original name}`; the database
/// keeps the public path `/uploads/{file name}`.
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Image storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// On-disk location for a public `/uploads/...` path.
    pub fn file_path(&self, public_path: &str) -> Result<PathBuf> {
        let name = public_path.strip_prefix(UPLOADS_PREFIX).unwrap_or(public_path);
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            bail!("invalid image path '{}'", public_path);
        }
        Ok(self.dir.join(name))
    }

    /// Write `bytes` under a fresh unique name and return its public path.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String> {
        let file_name = unique_file_name(original_name);
        let path = self.dir.join(&file_name);

        let mut file = fs::File::create(&path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        info!("Stored image {} ({} bytes)", file_name, bytes.len());
        Ok(format!("{UPLOADS_PREFIX}{file_name}"))
    }

    /// Remove an image file. A file that is already gone is not an error.
    pub async fn delete(&self, public_path: &str) -> Result<()> {
        let path = self.file_path(public_path)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted image {}", public_path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Image {} already gone", public_path);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// `{uuid}_{sanitised name}`; the uuid alone when nothing usable is left.
fn unique_file_name(original_name: Option<&str>) -> String {
    let id = Uuid::new_v4();
    let cleaned: String = original_name
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(MAX_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        id.to_string()
    } else {
        format!("{}_{}", id, cleaned)
    }
}
