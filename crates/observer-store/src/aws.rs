//! S3 bucket accessed through the AWS SDK, with directory sync via `aws s3 sync`

use std::path::Path;
use std::process::Command;

use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::Client;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::filters::SyncFilters;
use crate::types::{ListPage, ObjectStore, ObjectSummary};

/// S3 bucket read through a named credentials profile
///
/// Listing and downloads go through the SDK on a private current-thread
/// runtime. Recursive sync shells out to the `aws` CLI, which already
/// implements mirror semantics.
pub struct S3Store {
    client: Client,
    runtime: Runtime,
    bucket: String,
    profile: String,
    cli_program: String,
}

fn current_thread_runtime() -> Result<Runtime, StoreError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(StoreError::Runtime)
}

impl S3Store {
    /// Client configured from the profile's credentials and region
    pub fn connect(
        bucket: impl Into<String>,
        profile: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let runtime = current_thread_runtime()?;
        let profile = profile.into();
        let sdk_config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .profile_name(&profile)
                .load(),
        );
        info!(profile = %profile, "loaded AWS configuration");

        Ok(Self {
            client: Client::new(&sdk_config),
            runtime,
            bucket: bucket.into(),
            profile,
            cli_program: "aws".to_string(),
        })
    }

    /// Store over an already configured client
    pub fn from_client(
        client: Client,
        bucket: impl Into<String>,
        profile: impl Into<String>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            client,
            runtime: current_thread_runtime()?,
            bucket: bucket.into(),
            profile: profile.into(),
            cli_program: "aws".to_string(),
        })
    }

    /// Use a different executable in place of `aws` for sync
    pub fn with_cli_program(mut self, program: impl Into<String>) -> Self {
        self.cli_program = program.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }

    fn sync(
        &self,
        source: String,
        destination: String,
        filters: Option<&SyncFilters>,
    ) -> Result<(), StoreError> {
        let mut args = vec![
            "s3".to_string(),
            "sync".to_string(),
            format!("--profile={}", self.profile),
            source,
            destination,
        ];
        if let Some(filters) = filters {
            args.extend(filters.to_cli_args());
        }

        let command_line = format!("{} {}", self.cli_program, args.join(" "));
        info!("Calling: {}", command_line);

        let output = Command::new(&self.cli_program)
            .args(&args)
            .output()
            .map_err(|e| StoreError::io(&self.cli_program, e))?;

        if !output.status.success() {
            return Err(StoreError::Command {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Convert one SDK response page; the token is only kept while truncated
fn page_from_output(output: ListObjectsV2Output) -> ListPage {
    let next_continuation = if output.is_truncated.unwrap_or(false) {
        output.next_continuation_token
    } else {
        None
    };

    ListPage {
        objects: output
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|obj| {
                let size = obj.size.unwrap_or(0).max(0) as u64;
                obj.key.map(|key| ObjectSummary { key, size })
            })
            .collect(),
        common_prefixes: output
            .common_prefixes
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.prefix)
            .collect(),
        next_continuation,
    }
}

impl ObjectStore for S3Store {
    fn list_page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        let mut req = self.client.list_objects_v2().bucket(&self.bucket).prefix(prefix);
        if let Some(d) = delimiter {
            req = req.delimiter(d);
        }
        if let Some(t) = continuation {
            req = req.continuation_token(t);
        }

        let output = self
            .runtime
            .block_on(req.send())
            .map_err(|e| StoreError::Sdk {
                operation: "list_objects_v2",
                message: DisplayErrorContext(e).to_string(),
            })?;

        let page = page_from_output(output);
        debug!(
            prefix,
            objects = page.objects.len(),
            truncated = page.next_continuation.is_some(),
            "s3 list page"
        );
        Ok(page)
    }

    fn download(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let bytes = self.runtime.block_on(async {
            let obj = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                        StoreError::NotFound(key.to_string())
                    } else {
                        StoreError::Sdk {
                            operation: "get_object",
                            message: DisplayErrorContext(e).to_string(),
                        }
                    }
                })?;
            let collected = obj.body.collect().await.map_err(|e| StoreError::Sdk {
                operation: "get_object",
                message: e.to_string(),
            })?;
            Ok::<_, StoreError>(collected.into_bytes().to_vec())
        })?;

        debug!(key, bytes = bytes.len(), "s3 download");
        Ok(bytes)
    }

    fn sync_down(&self, remote_prefix: &str, local_dir: &Path) -> Result<(), StoreError> {
        self.sync(self.uri(remote_prefix), local_dir.display().to_string(), None)
    }

    fn sync_up(
        &self,
        local_dir: &Path,
        remote_prefix: &str,
        filters: &SyncFilters,
    ) -> Result<(), StoreError> {
        self.sync(local_dir.display().to_string(), self.uri(remote_prefix), Some(filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::Region;
    use aws_sdk_s3::types::{CommonPrefix, Object};

    fn offline_store() -> S3Store {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        S3Store::from_client(Client::from_conf(config), "bucket", "profile").unwrap()
    }

    #[test]
    fn test_truncated_page_keeps_token() {
        let output = ListObjectsV2Output::builder()
            .contents(Object::builder().key("p/session-1/a.bin").size(12).build())
            .common_prefixes(CommonPrefix::builder().prefix("p/x/").build())
            .is_truncated(true)
            .next_continuation_token("abc")
            .build();

        let page = page_from_output(output);
        assert_eq!(page.objects[0].key, "p/session-1/a.bin");
        assert_eq!(page.objects[0].size, 12);
        assert_eq!(page.common_prefixes, vec!["p/x/"]);
        assert_eq!(page.next_continuation.as_deref(), Some("abc"));
    }

    #[test]
    fn test_last_page_drops_token() {
        let output = ListObjectsV2Output::builder()
            .is_truncated(false)
            .next_continuation_token("stale")
            .build();

        assert_eq!(page_from_output(output), ListPage::default());
    }

    #[test]
    fn test_failed_sync_reports_status() {
        let store = offline_store().with_cli_program("false");
        let err = store.sync_down("p/session-1/", Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, StoreError::Command { .. }));
    }

    #[test]
    fn test_missing_cli_is_io_error() {
        let store = offline_store().with_cli_program("/nonexistent/aws-cli-for-tests");
        let filters = SyncFilters::new().exclude("*").unwrap();
        let err = store.sync_up(Path::new("/tmp"), "p/session-1/", &filters).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
