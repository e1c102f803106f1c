use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use object_store::{buffered::BufWriter, path::Path as ObjectPath, ObjectStore};
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::backend::{create_store, CannedAcl};
use super::StorageError;
use crate::config::StorageConfig;

const UPLOAD_CHUNK_SIZE: usize = 1024 * 1024;

/// One object returned by a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
}

/// The bucket operations the commands need
#[async_trait]
pub trait Bucket: Send + Sync {
    fn name(&self) -> &str;

    /// Metadata-only reachability check of the bucket itself
    async fn check_exists(&self) -> Result<(), StorageError>;

    /// Upload a local file under `key` with public-read visibility
    async fn put_file(&self, file_path: &Path, key: &str) -> Result<(), StorageError>;

    /// List objects, optionally restricted to keys under `{prefix}/`
    async fn list(&self, prefix: Option<&str>) -> Result<Vec<ObjectEntry>, StorageError>;

    /// Plain URL an uploaded object can be fetched from
    fn public_url(&self, key: &str) -> String;
}

/// `Bucket` backed by object_store
pub struct ObjectStoreBucket {
    name: String,
    endpoint_url: Option<String>,
    reader: Arc<dyn ObjectStore>,
    publisher: Arc<dyn ObjectStore>,
    show_progress: bool,
}

impl ObjectStoreBucket {
    /// Build S3 clients from configuration. No network traffic happens here.
    pub fn connect(config: &StorageConfig, show_progress: bool) -> Result<Self, StorageError> {
        let settings = config.s3_settings()?;
        let reader = create_store(&settings, None)?;
        let publisher = create_store(&settings, Some(CannedAcl::PublicRead))?;

        tracing::debug!(
            bucket = %settings.bucket,
            region = %settings.region,
            endpoint = ?settings.endpoint_url,
            "S3 clients created"
        );

        Ok(Self {
            name: settings.bucket,
            endpoint_url: settings.endpoint_url,
            reader,
            publisher,
            show_progress,
        })
    }

    /// Wrap an existing store; reads and writes both go through it
    #[cfg(test)]
    pub fn from_store(
        name: &str,
        endpoint_url: Option<&str>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            name: name.to_string(),
            endpoint_url: endpoint_url.map(str::to_string),
            reader: Arc::clone(&store),
            publisher: store,
            show_progress: false,
        }
    }
}

#[async_trait]
impl Bucket for ObjectStoreBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_exists(&self) -> Result<(), StorageError> {
        // S3 answers a listing of a missing bucket with NoSuchBucket; only the
        // first page is requested
        let mut objects = self.reader.list(None);
        match objects.next().await {
            Some(Err(e)) => Err(e.into()),
            _ => Ok(()),
        }
    }

    async fn put_file(&self, file_path: &Path, key: &str) -> Result<(), StorageError> {
        // `parse` keeps the key verbatim; `Path::from` would percent-encode it
        let location = ObjectPath::parse(key)?;
        let mut file = File::open(file_path).await?;
        let total = file.metadata().await?.len();
        let pb = create_progress_bar(self.show_progress, total);

        let mut writer = BufWriter::new(Arc::clone(&self.publisher), location);
        let copied = copy_to_writer(&mut file, &mut writer, pb.as_ref()).await;

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        if let Err(e) = copied {
            // A started multipart upload must not be left open on the server
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(
                    bucket = %self.name,
                    key,
                    error = %abort_err,
                    "Failed to abort upload"
                );
            }
            return Err(e.into());
        }

        tracing::info!(bucket = %self.name, key, bytes = total, "Upload complete");
        Ok(())
    }

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<ObjectEntry>, StorageError> {
        let prefix = prefix.map(ObjectPath::parse).transpose()?;
        let mut entries: Vec<ObjectEntry> = self
            .reader
            .list(prefix.as_ref())
            .map_ok(|meta| ObjectEntry {
                key: meta.location.to_string(),
                size: meta.size as u64,
            })
            .try_collect()
            .await?;

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    fn public_url(&self, key: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.name, key),
            None => format!("https://{}.s3.amazonaws.com/{}", self.name, key),
        }
    }
}

/// Stream `file` into `writer` and complete the upload
async fn copy_to_writer(
    file: &mut File,
    writer: &mut BufWriter,
    pb: Option<&ProgressBar>,
) -> std::io::Result<()> {
    let mut buf = vec![0u8; UPLOAD_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n]).await?;
        if let Some(pb) = pb {
            pb.inc(n as u64);
        }
    }
    writer.shutdown().await
}

/// Creates a byte progress bar for an upload
fn create_progress_bar(enabled: bool, total: u64) -> Option<ProgressBar> {
    if !enabled || total == 0 {
        return None;
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {bytes:>10}/{total_bytes:10} \
         ({bytes_per_sec}) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    Some(pb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;
    use object_store::PutPayload;
    use std::io::Write;
    use tempfile::TempDir;

    async fn seeded_store() -> Arc<dyn ObjectStore> {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        store
            .put(
                &ObjectPath::from("clips/a.mp4"),
                PutPayload::from(vec![0u8; 5 * 1024 * 1024]),
            )
            .await
            .unwrap();
        store
            .put(
                &ObjectPath::from("other/b.mp4"),
                PutPayload::from(vec![0u8; 1024 * 1024]),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_list_with_prefix() {
        let bucket = ObjectStoreBucket::from_store("media", None, seeded_store().await);

        let entries = bucket.list(Some("clips")).await.unwrap();
        assert_eq!(
            entries,
            vec![ObjectEntry {
                key: "clips/a.mp4".to_string(),
                size: 5 * 1024 * 1024,
            }]
        );
    }

    #[tokio::test]
    async fn test_list_prefix_does_not_match_partial_segment() {
        let bucket = ObjectStoreBucket::from_store("media", None, seeded_store().await);

        let entries = bucket.list(Some("clip")).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_sorted() {
        let bucket = ObjectStoreBucket::from_store("media", None, seeded_store().await);

        let keys: Vec<_> = bucket
            .list(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec!["clips/a.mp4", "other/b.mp4"]);
    }

    #[tokio::test]
    async fn test_check_exists_on_empty_store() {
        let bucket = ObjectStoreBucket::from_store("media", None, Arc::new(InMemory::new()));
        assert!(bucket.check_exists().await.is_ok());
    }

    #[tokio::test]
    async fn test_put_file_uploads_contents() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("video.mp4");
        let mut file = std::fs::File::create(&file_path).unwrap();
        file.write_all(b"0123456789ABCDEF").unwrap();

        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let bucket = ObjectStoreBucket::from_store("media", None, Arc::clone(&store));
        bucket
            .put_file(&file_path, "youtube/video.mp4")
            .await
            .unwrap();

        let bytes = store
            .get(&ObjectPath::from("youtube/video.mp4"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"0123456789ABCDEF");
    }

    #[tokio::test]
    async fn test_put_file_keeps_key_verbatim() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("Song [Official Video] #1.mp4");
        std::fs::write(&file_path, b"video").unwrap();

        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let bucket = ObjectStoreBucket::from_store("media", None, Arc::clone(&store));
        let key = "youtube/Song [Official Video] #1.mp4";
        bucket.put_file(&file_path, key).await.unwrap();

        let keys: Vec<_> = bucket
            .list(Some("youtube"))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec![key]);
        assert_eq!(
            bucket.public_url(key),
            "https://media.s3.amazonaws.com/youtube/Song [Official Video] #1.mp4"
        );
    }

    #[tokio::test]
    async fn test_put_file_rejects_invalid_key() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("video.mp4");
        std::fs::write(&file_path, b"video").unwrap();

        let bucket = ObjectStoreBucket::from_store("media", None, Arc::new(InMemory::new()));
        let result = bucket.put_file(&file_path, "youtube/../video.mp4").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_read_aborts_upload() {
        // Opening a directory succeeds on unix, reading it fails
        let temp = TempDir::new().unwrap();

        let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
        let bucket = ObjectStoreBucket::from_store("media", None, Arc::clone(&store));
        let result = bucket.put_file(temp.path(), "youtube/video.mp4").await;

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(bucket.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_missing_file_fails() {
        let bucket = ObjectStoreBucket::from_store("media", None, Arc::new(InMemory::new()));
        let result = bucket
            .put_file(Path::new("/nonexistent/video.mp4"), "youtube/video.mp4")
            .await;
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn test_public_url_default() {
        let bucket = ObjectStoreBucket::from_store("media", None, Arc::new(InMemory::new()));
        assert_eq!(
            bucket.public_url("youtube/a.mp4"),
            "https://media.s3.amazonaws.com/youtube/a.mp4"
        );
    }

    #[test]
    fn test_public_url_custom_endpoint() {
        let bucket = ObjectStoreBucket::from_store(
            "media",
            Some("http://localhost:9000/"),
            Arc::new(InMemory::new()),
        );
        assert_eq!(
            bucket.public_url("youtube/a.mp4"),
            "http://localhost:9000/media/youtube/a.mp4"
        );
    }

    #[test]
    fn test_connect_requires_bucket() {
        let config = StorageConfig {
            access_key_id: Some("key".to_string()),
            secret_access_key: Some("secret".to_string()),
            ..StorageConfig::default()
        };
        assert!(matches!(
            ObjectStoreBucket::connect(&config, false),
            Err(StorageError::Config(_))
        ));
    }
}
