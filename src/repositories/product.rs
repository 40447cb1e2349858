use crate::database::Database;
use crate::error::AppResult;
use crate::models::{CreateProduct, Product, UpdateProduct};
use uuid::Uuid;

/// 商品数据访问层
#[derive(Clone)]
pub struct ProductRepository {
    db: Database,
}

impl ProductRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 创建商品
    pub async fn create(&self, product: CreateProduct) -> AppResult<Product> {
        let created = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (product_id, shopify_product_id, shopify_variant_id)
            VALUES ($1, $2, $3)
            RETURNING product_id, shopify_product_id, shopify_variant_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&product.shopify_product_id)
        .bind(&product.shopify_variant_id)
        .fetch_one(self.db.pool())
        .await?;

        tracing::info!("创建商品成功: {}", created.product_id);
        Ok(created)
    }

    /// 列出全部商品
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, shopify_product_id, shopify_variant_id
            FROM products
            ORDER BY product_id
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(products)
    }

    /// 根据ID查询商品
    pub async fn find_by_id(&self, product_id: Uuid) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, shopify_product_id, shopify_variant_id
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(product)
    }

    /// 部分更新商品，返回更新后的行
    pub async fn update(
        &self,
        product_id: Uuid,
        update: UpdateProduct,
    ) -> AppResult<Option<Product>> {
        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET shopify_product_id = COALESCE($2, shopify_product_id),
                shopify_variant_id = COALESCE($3, shopify_variant_id)
            WHERE product_id = $1
            RETURNING product_id, shopify_product_id, shopify_variant_id
            "#,
        )
        .bind(product_id)
        .bind(update.shopify_product_id)
        .bind(update.shopify_variant_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(updated)
    }

    /// 删除商品（购物车关联行级联删除）
    pub async fn delete(&self, product_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
