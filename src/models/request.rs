use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// 购物请求实体
///
/// 一条请求代表用户的一次自然语言购物需求，是购物车、标签、附件的根实体。
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ShoppingRequest {
    /// 请求ID
    pub request_id: Uuid,
    /// Shopify用户ID
    pub shopify_user_id: String,
    /// 购物需求描述
    pub query: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 创建购物请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateShoppingRequest {
    pub shopify_user_id: String,
    pub query: String,
}

/// 更新购物请求（所有字段可选）
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateShoppingRequest {
    pub shopify_user_id: Option<String>,
    pub query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopping_request_serialization() {
        let request = ShoppingRequest {
            request_id: Uuid::new_v4(),
            shopify_user_id: "gid://shopify/Customer/123".to_string(),
            query: "一双跑步鞋".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["query"], "一双跑步鞋");
        assert!(json["request_id"].is_string());
    }

    #[test]
    fn test_update_request_partial() {
        let update: UpdateShoppingRequest =
            serde_json::from_str(r#"{"query": "改成登山鞋"}"#).unwrap();
        assert!(update.shopify_user_id.is_none());
        assert_eq!(update.query.as_deref(), Some("改成登山鞋"));
    }
}
