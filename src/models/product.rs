use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// 商品实体
///
/// 仅记录Shopify侧的商品与变体标识，不带时间戳。
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    /// 商品ID
    pub product_id: Uuid,
    /// Shopify商品ID
    pub shopify_product_id: String,
    /// Shopify变体ID
    pub shopify_variant_id: String,
}

/// 创建商品
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProduct {
    pub shopify_product_id: String,
    pub shopify_variant_id: String,
}

/// 更新商品（所有字段可选）
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProduct {
    pub shopify_product_id: Option<String>,
    pub shopify_variant_id: Option<String>,
}
