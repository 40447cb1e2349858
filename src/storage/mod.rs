pub mod r2;
pub mod shopify;

pub use r2::R2Storage;
pub use shopify::ShopifyFilesStorage;

use crate::config::{StorageBackendKind, StorageConfig};
use std::sync::Arc;

/// 存储操作错误类型
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 调用方参数错误（空文件、缺少文件名），不会触发任何网络请求
    #[error("参数校验失败: {0}")]
    Validation(String),

    /// 后端配置缺失或非法，构造存储实例时立即暴露
    #[error("存储配置错误: {0}")]
    Configuration(String),

    /// 多阶段上传过程中的任意失败（预约、传输、注册）
    #[error("文件上传失败: {0}")]
    Upload(String),

    /// 解析文件URL时的传输层失败
    #[error("解析文件URL失败: {0}")]
    Resolve(String),

    /// 重试耗尽后文件仍不可见或URL仍不可用
    #[error("文件不存在或尚未就绪: {0}")]
    NotFound(String),

    /// 其他后端错误（删除失败、GraphQL传输错误等）
    #[error("存储后端错误: {0}")]
    Backend(String),
}

/// 存储操作Result类型别名
pub type StorageResult<T> = Result<T, StorageError>;

/// 媒体类别，由MIME前缀粗分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Video,
    File,
}

impl MediaCategory {
    /// Shopify FileContentType 枚举对应的字符串值
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Image => "IMAGE",
            MediaCategory::Video => "VIDEO",
            MediaCategory::File => "FILE",
        }
    }
}

/// 根据文件名推断MIME类型和媒体类别
///
/// 无法识别的扩展名回退为 `application/octet-stream`，类别为 FILE。
pub fn detect_content_type(filename: &str) -> (String, MediaCategory) {
    let mime = mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string();

    let category = if mime.starts_with("image/") {
        MediaCategory::Image
    } else if mime.starts_with("video/") {
        MediaCategory::Video
    } else {
        MediaCategory::File
    };

    (mime, category)
}

/// 资产存储抽象接口
///
/// 记录层只通过该接口与具体后端交互，持久化的 file_key 对记录层完全不透明。
#[async_trait::async_trait]
pub trait AssetStorage: Send + Sync {
    /// 上传文件，返回后端特定格式的存储键
    async fn upload(
        &self,
        request_id: &str,
        content: &[u8],
        filename: &str,
    ) -> StorageResult<String>;

    /// 按存储键删除文件（幂等：对象不存在视为成功）
    async fn delete(&self, file_key: &str) -> StorageResult<bool>;

    /// 将存储键解析为当前可访问的URL
    ///
    /// URL不会被持久化，每次读取都重新解析。
    async fn resolve_url(&self, file_key: &str, expires_in_secs: u64) -> StorageResult<String>;
}

/// 根据配置创建存储后端实例
///
/// 进程启动时调用一次，所选后端在整个进程生命周期内固定。
/// 缺失所选后端的配置段视为配置错误，服务拒绝启动。
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn AssetStorage>> {
    match config.backend {
        StorageBackendKind::R2 => {
            let r2_config = config.r2.as_ref().ok_or_else(|| {
                StorageError::Configuration("选择了R2后端但缺少 [storage.r2] 配置段".to_string())
            })?;
            let storage = R2Storage::new(r2_config.clone()).await?;
            tracing::info!("已启用R2存储后端，bucket: {}", r2_config.bucket);
            Ok(Arc::new(storage))
        }
        StorageBackendKind::Shopify => {
            let shopify_config = config.shopify.as_ref().ok_or_else(|| {
                StorageError::Configuration(
                    "选择了Shopify后端但缺少 [storage.shopify] 配置段".to_string(),
                )
            })?;
            let storage = ShopifyFilesStorage::new(shopify_config.clone())?;
            tracing::info!(
                "已启用Shopify文件存储后端，店铺: {}",
                shopify_config.store_domain
            );
            Ok(Arc::new(storage))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{R2Config, ShopifyConfig};

    fn r2_test_config() -> R2Config {
        R2Config {
            endpoint: "http://localhost:9000".to_string(),
            access_key_id: "key".to_string(),
            secret_access_key: "secret".to_string(),
            bucket: "assets".to_string(),
            public_url_base: None,
        }
    }

    #[test]
    fn test_detect_content_type_image() {
        let (mime, category) = detect_content_type("photo.png");
        assert_eq!(mime, "image/png");
        assert_eq!(category, MediaCategory::Image);
    }

    #[test]
    fn test_detect_content_type_video() {
        let (mime, category) = detect_content_type("clip.mp4");
        assert_eq!(mime, "video/mp4");
        assert_eq!(category, MediaCategory::Video);
    }

    #[test]
    fn test_detect_content_type_fallback() {
        let (mime, category) = detect_content_type("data.unknownext");
        assert_eq!(mime, "application/octet-stream");
        assert_eq!(category, MediaCategory::File);

        let (mime, _) = detect_content_type("noextension");
        assert_eq!(mime, "application/octet-stream");
    }

    #[test]
    fn test_media_category_as_str() {
        assert_eq!(MediaCategory::Image.as_str(), "IMAGE");
        assert_eq!(MediaCategory::Video.as_str(), "VIDEO");
        assert_eq!(MediaCategory::File.as_str(), "FILE");
    }

    #[tokio::test]
    async fn test_create_storage_missing_backend_section() {
        let config = StorageConfig {
            backend: StorageBackendKind::Shopify,
            r2: Some(r2_test_config()),
            shopify: None,
        };

        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_create_storage_r2() {
        let config = StorageConfig {
            backend: StorageBackendKind::R2,
            r2: Some(r2_test_config()),
            shopify: None,
        };

        assert!(create_storage(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_storage_shopify_incomplete_config() {
        let config = StorageConfig {
            backend: StorageBackendKind::Shopify,
            r2: None,
            shopify: Some(ShopifyConfig {
                store_domain: "".to_string(),
                admin_access_token: "token".to_string(),
                api_version: "2025-07".to_string(),
            }),
        };

        let result = create_storage(&config).await;
        assert!(matches!(result, Err(StorageError::Configuration(_))));
    }
}
