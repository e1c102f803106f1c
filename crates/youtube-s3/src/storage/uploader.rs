use std::path::Path;

use super::{format_megabytes, Bucket};

/// Check the bucket, upload `file_path` under `key` and print the public URL.
///
/// Failures are printed and reported as `None`; nothing is propagated. The
/// upload is never attempted when the bucket check fails.
pub async fn upload_file_to_bucket(
    bucket: &dyn Bucket,
    file_path: &Path,
    key: &str,
) -> Option<String> {
    if let Err(e) = bucket.check_exists().await {
        tracing::warn!(bucket = bucket.name(), error = %e, "Bucket check failed");
        println!("❌ Bucket not found: {}", bucket.name());
        return None;
    }
    println!("✅ Bucket found: {}", bucket.name());

    let size = match tokio::fs::metadata(file_path).await {
        Ok(meta) => meta.len(),
        Err(e) => {
            println!("❌ Upload error: {e}");
            return None;
        }
    };
    println!("📤 Uploading {key} ({})...", format_megabytes(size));

    if let Err(e) = bucket.put_file(file_path, key).await {
        tracing::warn!(bucket = bucket.name(), key, error = %e, "Upload failed");
        println!("❌ Upload error: {e}");
        return None;
    }

    let url = bucket.public_url(key);
    println!("✅ Uploaded: {url}");
    Some(url)
}
