use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// 购物请求标签
///
/// 复合主键 (tag_value, request_id)，请求删除时级联删除。
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestTag {
    /// 标签值
    pub tag_value: String,
    /// 所属购物请求ID
    pub request_id: Uuid,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 创建购物请求标签
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRequestTag {
    pub tag_value: String,
    pub request_id: Uuid,
}
