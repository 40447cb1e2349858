use super::{AssetStorage, StorageError, StorageResult, detect_content_type};
use crate::config::R2Config;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    Client,
    config::Credentials,
    error::ProvideErrorMetadata,
    primitives::ByteStream,
    types::ObjectCannedAcl,
};
use std::sync::Arc;
use uuid::Uuid;

/// Cloudflare R2 存储实现（S3兼容接口）
#[derive(Debug, Clone)]
pub struct R2Storage {
    client: Arc<Client>,
    config: R2Config,
    bucket: String,
}

impl R2Storage {
    /// 创建新的R2存储实例
    pub async fn new(config: R2Config) -> StorageResult<Self> {
        if config.endpoint.is_empty()
            || config.access_key_id.is_empty()
            || config.secret_access_key.is_empty()
            || config.bucket.is_empty()
        {
            return Err(StorageError::Configuration(
                "R2配置不完整，endpoint、access_key_id、secret_access_key、bucket均为必填".to_string(),
            ));
        }

        // 创建静态凭证
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None, // session token
            None, // expiration
            "r2", // provider name
        );

        // 构建S3配置
        let s3_config = aws_sdk_s3::Config::builder()
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .region(Region::new("auto")) // R2固定使用auto区域
            .force_path_style(true)
            .behavior_version(BehaviorVersion::latest())
            .build();

        let client = Client::from_conf(s3_config);
        let bucket = config.bucket.clone();

        Ok(Self {
            client: Arc::new(client),
            config,
            bucket,
        })
    }

    /// 生成唯一的存储键，保留原始文件的扩展名
    fn generate_file_key(request_id: &str, filename: &str) -> String {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        format!("assets/{}/{}{}", request_id, Uuid::new_v4(), extension)
    }
}

#[async_trait::async_trait]
impl AssetStorage for R2Storage {
    async fn upload(
        &self,
        request_id: &str,
        content: &[u8],
        filename: &str,
    ) -> StorageResult<String> {
        if filename.is_empty() {
            return Err(StorageError::Validation("缺少文件名".to_string()));
        }
        if content.is_empty() {
            return Err(StorageError::Validation("文件内容为空".to_string()));
        }

        let file_key = Self::generate_file_key(request_id, filename);
        let (content_type, _) = detect_content_type(filename);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&file_key)
            .body(ByteStream::from(content.to_vec()))
            .content_type(&content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::Upload(format!("上传文件到R2失败: {}", e)))?;

        tracing::info!(
            "成功上传文件到R2: {}/{} ({} 字节)",
            self.bucket,
            file_key,
            content.len()
        );

        Ok(file_key)
    }

    async fn delete(&self, file_key: &str) -> StorageResult<bool> {
        match self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(file_key)
            .send()
            .await
        {
            Ok(_) => {
                tracing::info!("成功删除R2文件: {}/{}", self.bucket, file_key);
                Ok(true)
            }
            Err(err) => {
                let service_err = err.into_service_error();
                // 对象不存在视为删除成功（幂等删除）
                if service_err.meta().code() == Some("NoSuchKey") {
                    tracing::debug!("R2文件已不存在，视为删除成功: {}", file_key);
                    Ok(true)
                } else {
                    Err(StorageError::Backend(format!(
                        "删除R2文件失败: {}",
                        service_err
                    )))
                }
            }
        }
    }

    async fn resolve_url(&self, file_key: &str, expires_in_secs: u64) -> StorageResult<String> {
        // 对象以public-read上传，配置了CDN域名时直接返回稳定的公开URL
        if let Some(base) = &self.config.public_url_base {
            return Ok(format!("{}/{}", base.trim_end_matches('/'), file_key));
        }

        let presigning_config = aws_sdk_s3::presigning::PresigningConfig::expires_in(
            std::time::Duration::from_secs(expires_in_secs),
        )
        .map_err(|e| StorageError::Resolve(format!("预签名配置错误: {}", e)))?;

        let presigned_request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(file_key)
            .presigned(presigning_config)
            .await
            .map_err(|e| StorageError::Resolve(format!("生成预签名URL失败: {}", e)))?;

        Ok(presigned_request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_config(endpoint: &str) -> R2Config {
        R2Config {
            endpoint: endpoint.to_string(),
            access_key_id: "test-key".to_string(),
            secret_access_key: "test-secret".to_string(),
            bucket: "assets".to_string(),
            public_url_base: None,
        }
    }

    /// 启动一个记录调用次数的S3桩服务器
    async fn spawn_s3_stub() -> (String, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let put_calls = Arc::new(AtomicUsize::new(0));
        let delete_calls = Arc::new(AtomicUsize::new(0));
        let puts = put_calls.clone();
        let deletes = delete_calls.clone();

        let app = axum::Router::new().route(
            "/{*path}",
            axum::routing::put(move || {
                let puts = puts.clone();
                async move {
                    puts.fetch_add(1, Ordering::SeqCst);
                    ([(axum::http::header::ETAG, "\"stub-etag\"")], StatusCode::OK)
                }
            })
            .delete(move || {
                let deletes = deletes.clone();
                async move {
                    deletes.fetch_add(1, Ordering::SeqCst);
                    StatusCode::NO_CONTENT
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), put_calls, delete_calls)
    }

    /// 对所有DELETE请求都回答NoSuchKey的S3桩服务器
    async fn spawn_s3_stub_missing_object() -> (String, Arc<AtomicUsize>) {
        let delete_calls = Arc::new(AtomicUsize::new(0));
        let deletes = delete_calls.clone();

        let app = axum::Router::new().route(
            "/{*path}",
            axum::routing::delete(move || {
                let deletes = deletes.clone();
                async move {
                    deletes.fetch_add(1, Ordering::SeqCst);
                    (
                        StatusCode::NOT_FOUND,
                        [(axum::http::header::CONTENT_TYPE, "application/xml")],
                        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                         <Error><Code>NoSuchKey</Code>\
                         <Message>The specified key does not exist.</Message></Error>",
                    )
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), delete_calls)
    }

    #[test]
    fn test_generate_file_key_preserves_extension() {
        let key = R2Storage::generate_file_key("req-123", "photo.png");
        assert!(key.starts_with("assets/req-123/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_generate_file_key_without_extension() {
        let key = R2Storage::generate_file_key("req-123", "README");
        assert!(key.starts_with("assets/req-123/"));
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_generate_file_key_unique() {
        let a = R2Storage::generate_file_key("req-123", "a.txt");
        let b = R2Storage::generate_file_key("req-123", "a.txt");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_new_rejects_incomplete_config() {
        let mut config = test_config("http://localhost:9000");
        config.access_key_id = String::new();

        let result = R2Storage::new(config).await;
        assert!(matches!(result, Err(StorageError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_content() {
        let (endpoint, put_calls, _) = spawn_s3_stub().await;
        let storage = R2Storage::new(test_config(&endpoint)).await.unwrap();

        let result = storage.upload("req-1", b"", "a.txt").await;
        assert!(matches!(result, Err(StorageError::Validation(_))));
        assert_eq!(put_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upload_puts_object_once() {
        let (endpoint, put_calls, _) = spawn_s3_stub().await;
        let storage = R2Storage::new(test_config(&endpoint)).await.unwrap();

        let key = storage.upload("req-1", b"hello", "pic.png").await.unwrap();
        assert!(key.starts_with("assets/req-1/"));
        assert!(key.ends_with(".png"));
        assert_eq!(put_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_succeeds() {
        let (endpoint, _, delete_calls) = spawn_s3_stub().await;
        let storage = R2Storage::new(test_config(&endpoint)).await.unwrap();

        let ok = storage.delete("assets/req-1/foo.png").await.unwrap();
        assert!(ok);
        assert_eq!(delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_object_is_success() {
        let (endpoint, delete_calls) = spawn_s3_stub_missing_object().await;
        let storage = R2Storage::new(test_config(&endpoint)).await.unwrap();

        // 对象已不存在时删除依然视为成功（幂等）
        let ok = storage.delete("assets/req-1/gone.png").await.unwrap();
        assert!(ok);
        assert_eq!(delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_url_contains_key_and_expiry() {
        let storage = R2Storage::new(test_config("http://localhost:9000"))
            .await
            .unwrap();

        let url = storage
            .resolve_url("assets/req-1/abc.txt", 123)
            .await
            .unwrap();
        assert!(url.contains("assets/req-1/abc.txt"));
        assert!(url.contains("X-Amz-Expires=123"));
    }

    #[tokio::test]
    async fn test_resolve_url_prefers_public_base() {
        let mut config = test_config("http://localhost:9000");
        config.public_url_base = Some("https://cdn.example.com/".to_string());
        let storage = R2Storage::new(config).await.unwrap();

        let url = storage
            .resolve_url("assets/req-1/abc.txt", 3600)
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example.com/assets/req-1/abc.txt");
    }
}
