use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::debug;

/// uploaded audio lands here, relative to the upload root
pub const TRACK_DIR: &str = "documents/music";
/// album cover uploads
pub const IMAGE_DIR: &str = "documents/images";

/// Local filesystem storage rooted at the configured upload root. Entity rows
/// store paths relative to this root.
#[derive(Debug, Clone)]
pub struct MediaDir {
    root: Utf8PathBuf,
}

impl MediaDir {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of a stored file.
    pub fn resolve(&self, rel: impl AsRef<Utf8Path>) -> Utf8PathBuf {
        self.root.join(rel)
    }

    /// Store an uploaded audio file, returning its relative path.
    pub async fn store_track(&self, name: &str, data: &[u8]) -> io::Result<Utf8PathBuf> {
        self.store(Utf8Path::new(TRACK_DIR).join(name), data).await
    }

    /// Store an uploaded cover image, returning its relative path.
    pub async fn store_image(&self, name: &str, data: &[u8]) -> io::Result<Utf8PathBuf> {
        self.store(Utf8Path::new(IMAGE_DIR).join(name), data).await
    }

    async fn store(&self, rel: Utf8PathBuf, data: &[u8]) -> io::Result<Utf8PathBuf> {
        let path = self.resolve(&rel);
        let containing_dir = path.parent().expect("upload path has no parent");
        tokio::fs::create_dir_all(containing_dir).await?;
        debug!("write {path}");
        let mut file = File::create(path).await?;
        file.write_all(data).await?;
        Ok(rel)
    }

    /// Delete a stored file. Idempotent: a file that is already gone is not
    /// an error, the record's absence is the source of truth.
    pub async fn remove(&self, rel: impl AsRef<Utf8Path>) -> io::Result<()> {
        let path = self.resolve(rel);
        match tokio::fs::remove_file(&path).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{path} already gone");
                Ok(())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(tmp: &tempfile::TempDir) -> MediaDir {
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_owned()).expect("utf-8 tempdir");
        MediaDir::new(root)
    }

    #[tokio::test]
    async fn uploads_land_under_their_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let media = media(&tmp);

        let rel = media.store_track("demo.mp3", b"audio").await.unwrap();
        assert!(rel.starts_with(TRACK_DIR));
        assert!(media.resolve(&rel).is_file());

        let rel = media.store_image("cover.jpg", b"image").await.unwrap();
        assert!(rel.starts_with(IMAGE_DIR));
        assert!(media.resolve(&rel).is_file());
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let media = media(&tmp);

        let rel = media.store_track("demo.mp3", b"audio").await.unwrap();
        media.remove(&rel).await.unwrap();
        assert!(!media.resolve(&rel).exists());
        media.remove(&rel).await.unwrap();
    }
}
