use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// 购物请求附件（数据库行）
///
/// 数据库只保存不透明的存储键（R2对象键或Shopify文件gid），
/// 不保存任何URL。URL在每次读取时由存储后端重新解析。
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestAsset {
    /// 附件ID
    pub request_asset_id: Uuid,
    /// 所属购物请求ID
    pub request_id: Uuid,
    /// 存储键（不透明，仅所选后端可解析）
    pub file_key: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 购物请求附件（API响应）
///
/// 在行数据之外附带本次解析出的访问URL。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestAssetResponse {
    /// 附件ID
    pub request_asset_id: Uuid,
    /// 所属购物请求ID
    pub request_id: Uuid,
    /// 存储键
    pub file_key: String,
    /// 本次解析出的访问URL（带时效）
    pub url: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl RequestAssetResponse {
    /// 由数据库行与解析出的URL组装响应
    pub fn from_asset(asset: RequestAsset, url: String) -> Self {
        Self {
            request_asset_id: asset.request_asset_id,
            request_id: asset.request_id,
            file_key: asset.file_key,
            url,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        }
    }
}

/// 基于已有存储键登记附件
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRequestAsset {
    pub request_id: Uuid,
    pub file_key: String,
}

/// 更新附件（所有字段可选）
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRequestAsset {
    pub request_id: Option<Uuid>,
    pub file_key: Option<String>,
}

/// 签名URL响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignedUrlResponse {
    /// 附件ID
    pub request_asset_id: Uuid,
    /// 签名URL
    pub url: String,
    /// 有效期（秒）
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_from_asset() {
        let asset = RequestAsset {
            request_asset_id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            file_key: "assets/req-1/abc.png".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = RequestAssetResponse::from_asset(
            asset.clone(),
            "https://cdn.example.com/assets/req-1/abc.png?sig=x".to_string(),
        );

        assert_eq!(response.request_asset_id, asset.request_asset_id);
        assert_eq!(response.file_key, asset.file_key);
        assert!(response.url.contains("abc.png"));
    }
}
