use crate::database::Database;
use crate::error::AppResult;
use crate::models::{Cart, CreateCart, UpdateCart};
use uuid::Uuid;

/// 购物车数据访问层
#[derive(Clone)]
pub struct CartRepository {
    db: Database,
}

impl CartRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 创建购物车（request_id外键约束校验归属关系）
    pub async fn create(&self, cart: CreateCart) -> AppResult<Cart> {
        let created = sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO carts (cart_id, request_id, shopify_user_id)
            VALUES ($1, $2, $3)
            RETURNING cart_id, request_id, shopify_user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cart.request_id)
        .bind(&cart.shopify_user_id)
        .fetch_one(self.db.pool())
        .await?;

        tracing::info!("创建购物车成功: {}", created.cart_id);
        Ok(created)
    }

    /// 列出全部购物车（按创建时间倒序）
    pub async fn list(&self) -> AppResult<Vec<Cart>> {
        let carts = sqlx::query_as::<_, Cart>(
            r#"
            SELECT cart_id, request_id, shopify_user_id, created_at, updated_at
            FROM carts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(carts)
    }

    /// 根据ID查询购物车
    pub async fn find_by_id(&self, cart_id: Uuid) -> AppResult<Option<Cart>> {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            SELECT cart_id, request_id, shopify_user_id, created_at, updated_at
            FROM carts
            WHERE cart_id = $1
            "#,
        )
        .bind(cart_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(cart)
    }

    /// 部分更新购物车，返回更新后的行
    pub async fn update(&self, cart_id: Uuid, update: UpdateCart) -> AppResult<Option<Cart>> {
        let updated = sqlx::query_as::<_, Cart>(
            r#"
            UPDATE carts
            SET request_id = COALESCE($2, request_id),
                shopify_user_id = COALESCE($3, shopify_user_id),
                updated_at = CURRENT_TIMESTAMP
            WHERE cart_id = $1
            RETURNING cart_id, request_id, shopify_user_id, created_at, updated_at
            "#,
        )
        .bind(cart_id)
        .bind(update.request_id)
        .bind(update.shopify_user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(updated)
    }

    /// 删除购物车（关联行级联删除）
    pub async fn delete(&self, cart_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM carts WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
