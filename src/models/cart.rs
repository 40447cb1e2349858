use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// 购物车实体
///
/// 一个购物车隶属于一条购物请求，请求删除时级联删除。
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cart {
    /// 购物车ID
    pub cart_id: Uuid,
    /// 所属购物请求ID
    pub request_id: Uuid,
    /// Shopify用户ID
    pub shopify_user_id: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 创建购物车
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCart {
    pub request_id: Uuid,
    pub shopify_user_id: String,
}

/// 更新购物车（所有字段可选）
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateCart {
    pub request_id: Option<Uuid>,
    pub shopify_user_id: Option<String>,
}
