use clap::Args;

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const BUCKET_NAME_VAR: &str = "AWS_STORAGE_BUCKET_NAME";

pub const DEFAULT_REGION: &str = "us-east-1";

/// Storage settings, read from flags or the environment (and `.env`)
#[derive(Args, Debug, Clone)]
pub struct StorageConfig {
    /// S3 access key id
    #[arg(long, env = "AWS_ACCESS_KEY_ID", global = true, hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// S3 secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", global = true, hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// S3 region
    #[arg(long, env = "AWS_S3_REGION_NAME", global = true, default_value = DEFAULT_REGION)]
    pub region: String,

    /// S3 endpoint URL (for MinIO or other S3-compatible services)
    #[arg(long, env = "AWS_S3_ENDPOINT_URL", global = true)]
    pub endpoint_url: Option<String>,

    /// Bucket that receives uploads
    #[arg(long, env = "AWS_STORAGE_BUCKET_NAME", global = true)]
    pub bucket: Option<String>,
}

/// Fully resolved settings for building an S3 client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub bucket: String,
}

impl StorageConfig {
    /// The keys `check-config` reports on, paired with their current values
    pub fn required_keys(&self) -> [(&'static str, Option<&str>); 3] {
        [
            (ACCESS_KEY_ID_VAR, self.access_key_id.as_deref()),
            (SECRET_ACCESS_KEY_VAR, self.secret_access_key.as_deref()),
            (BUCKET_NAME_VAR, self.bucket.as_deref()),
        ]
    }

    /// Resolve into client settings, failing on the first missing key
    pub fn s3_settings(&self) -> Result<S3Settings, ConfigError> {
        let require = |name: &'static str, value: &Option<String>| {
            value.clone().ok_or(ConfigError::MissingKey(name))
        };

        Ok(S3Settings {
            access_key_id: require(ACCESS_KEY_ID_VAR, &self.access_key_id)?,
            secret_access_key: require(SECRET_ACCESS_KEY_VAR, &self.secret_access_key)?,
            region: self.region.clone(),
            endpoint_url: self
                .endpoint_url
                .clone()
                .filter(|endpoint| !endpoint.is_empty()),
            bucket: require(BUCKET_NAME_VAR, &self.bucket)?,
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            bucket: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingKey(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> StorageConfig {
        StorageConfig {
            access_key_id: Some("AKIAEXAMPLE1234".to_string()),
            secret_access_key: Some("secret-value-abcd".to_string()),
            bucket: Some("media".to_string()),
            ..StorageConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_incomplete() {
        let config = StorageConfig::default();
        assert_eq!(config.region, DEFAULT_REGION);
        assert!(matches!(
            config.s3_settings(),
            Err(ConfigError::MissingKey(ACCESS_KEY_ID_VAR))
        ));
    }

    #[test]
    fn test_missing_bucket_is_reported() {
        let mut config = complete_config();
        config.bucket = None;
        assert!(matches!(
            config.s3_settings(),
            Err(ConfigError::MissingKey(BUCKET_NAME_VAR))
        ));
    }

    #[test]
    fn test_complete_config_resolves() {
        let settings = complete_config().s3_settings().unwrap();
        assert_eq!(settings.bucket, "media");
        assert_eq!(settings.region, "us-east-1");
        assert_eq!(settings.endpoint_url, None);
    }

    #[test]
    fn test_empty_endpoint_is_ignored() {
        let mut config = complete_config();
        config.endpoint_url = Some(String::new());
        assert_eq!(config.s3_settings().unwrap().endpoint_url, None);
    }

    #[test]
    fn test_required_keys_order() {
        let names: Vec<_> = complete_config()
            .required_keys()
            .iter()
            .map(|(name, _)| *name)
            .collect();
        assert_eq!(
            names,
            vec![ACCESS_KEY_ID_VAR, SECRET_ACCESS_KEY_VAR, BUCKET_NAME_VAR]
        );
    }
}
