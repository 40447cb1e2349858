use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// 购物车-商品关联
///
/// 复合主键 (cart_id, product_id)，两侧任一删除时级联删除。
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CartProduct {
    /// 购物车ID
    pub cart_id: Uuid,
    /// 商品ID
    pub product_id: Uuid,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 创建购物车-商品关联
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCartProduct {
    pub cart_id: Uuid,
    pub product_id: Uuid,
}
