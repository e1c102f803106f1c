use http::header::{HeaderMap, HeaderName, HeaderValue};
use object_store::{aws::AmazonS3Builder, ClientOptions, ObjectStore};
use std::sync::Arc;

use super::StorageError;
use crate::config::S3Settings;

/// Canned ACL applied to every write made through a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedAcl {
    PublicRead,
}

impl CannedAcl {
    fn header_value(self) -> HeaderValue {
        match self {
            CannedAcl::PublicRead => HeaderValue::from_static("public-read"),
        }
    }
}

/// Create an S3 ObjectStore from resolved settings
///
/// With an `acl`, every request carries an `x-amz-acl` header, so such a
/// store is only used for uploads.
pub fn create_store(
    settings: &S3Settings,
    acl: Option<CannedAcl>,
) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(&settings.bucket)
        .with_region(&settings.region)
        .with_access_key_id(&settings.access_key_id)
        .with_secret_access_key(&settings.secret_access_key);

    if let Some(endpoint) = &settings.endpoint_url {
        builder = builder
            .with_endpoint(endpoint)
            .with_allow_http(endpoint.starts_with("http://"));
    }

    if let Some(acl) = acl {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-amz-acl"), acl.header_value());
        builder = builder.with_client_options(ClientOptions::new().with_default_headers(headers));
    }

    let store = builder.build()?;
    Ok(Arc::new(store))
}
