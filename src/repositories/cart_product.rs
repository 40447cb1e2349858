use crate::database::Database;
use crate::error::AppResult;
use crate::models::{CartProduct, CreateCartProduct};
use uuid::Uuid;

/// 购物车-商品关联数据访问层
///
/// 关联表使用复合主键，没有更新操作，只有建立与解除。
#[derive(Clone)]
pub struct CartProductRepository {
    db: Database,
}

impl CartProductRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 建立购物车-商品关联（两侧外键约束校验存在性）
    pub async fn create(&self, link: CreateCartProduct) -> AppResult<CartProduct> {
        let created = sqlx::query_as::<_, CartProduct>(
            r#"
            INSERT INTO carts_products (cart_id, product_id)
            VALUES ($1, $2)
            RETURNING cart_id, product_id, created_at, updated_at
            "#,
        )
        .bind(link.cart_id)
        .bind(link.product_id)
        .fetch_one(self.db.pool())
        .await?;

        tracing::info!(
            "建立购物车商品关联: cart={} product={}",
            created.cart_id,
            created.product_id
        );
        Ok(created)
    }

    /// 列出全部关联
    pub async fn list(&self) -> AppResult<Vec<CartProduct>> {
        let links = sqlx::query_as::<_, CartProduct>(
            r#"
            SELECT cart_id, product_id, created_at, updated_at
            FROM carts_products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(links)
    }

    /// 根据复合主键查询关联
    pub async fn find(&self, cart_id: Uuid, product_id: Uuid) -> AppResult<Option<CartProduct>> {
        let link = sqlx::query_as::<_, CartProduct>(
            r#"
            SELECT cart_id, product_id, created_at, updated_at
            FROM carts_products
            WHERE cart_id = $1 AND product_id = $2
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(link)
    }

    /// 解除关联
    pub async fn delete(&self, cart_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM carts_products WHERE cart_id = $1 AND product_id = $2")
                .bind(cart_id)
                .bind(product_id)
                .execute(self.db.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
