use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::output::CommandOutput;
use crate::config::StorageConfig;
use crate::storage::{format_megabytes, Bucket, ObjectEntry, ObjectStoreBucket};

#[derive(Args, Debug)]
pub struct ListBucketArgs {
    /// Only list keys under this folder
    #[arg(long)]
    pub folder: Option<String>,
}

#[derive(Serialize)]
struct ListingOutput<'a> {
    bucket: &'a str,
    prefix: Option<&'a str>,
    objects: Vec<ListedObject<'a>>,
}

#[derive(Serialize)]
struct ListedObject<'a> {
    key: &'a str,
    size: u64,
}

pub async fn run(
    global: &crate::GlobalOpts,
    storage: &StorageConfig,
    args: ListBucketArgs,
) -> Result<()> {
    let bucket = ObjectStoreBucket::connect(storage, false)?;
    let entries = list_objects(&bucket, args.folder.as_deref()).await?;

    if global.json {
        let objects = entries
            .iter()
            .map(|e| ListedObject {
                key: &e.key,
                size: e.size,
            })
            .collect();
        CommandOutput::success(ListingOutput {
            bucket: bucket.name(),
            prefix: args.folder.as_deref(),
            objects,
        })?
        .print()?;
    } else {
        print_listing(bucket.name(), &entries);
    }

    Ok(())
}

async fn list_objects(bucket: &dyn Bucket, folder: Option<&str>) -> Result<Vec<ObjectEntry>> {
    let folder = folder.map(|f| f.trim_end_matches('/')).filter(|f| !f.is_empty());
    bucket
        .list(folder)
        .await
        .with_context(|| format!("Failed to list bucket {}", bucket.name()))
}

fn print_listing(bucket: &str, entries: &[ObjectEntry]) {
    if entries.is_empty() {
        println!("📁 Bucket is empty");
        return;
    }

    println!("📁 Files in {bucket}:");
    for entry in entries {
        println!("  📄 {}", format_entry(entry));
    }
}

fn format_entry(entry: &ObjectEntry) -> String {
    format!("{} ({})", entry.key, format_megabytes(entry.size))
}
