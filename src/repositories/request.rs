use crate::database::Database;
use crate::error::AppResult;
use crate::models::{CreateShoppingRequest, ShoppingRequest, UpdateShoppingRequest};
use uuid::Uuid;

/// 购物请求数据访问层
#[derive(Clone)]
pub struct RequestRepository {
    db: Database,
}

impl RequestRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 创建购物请求
    pub async fn create(&self, request: CreateShoppingRequest) -> AppResult<ShoppingRequest> {
        let created = sqlx::query_as::<_, ShoppingRequest>(
            r#"
            INSERT INTO requests (request_id, shopify_user_id, query)
            VALUES ($1, $2, $3)
            RETURNING request_id, shopify_user_id, query, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.shopify_user_id)
        .bind(&request.query)
        .fetch_one(self.db.pool())
        .await?;

        tracing::info!("创建购物请求成功: {}", created.request_id);
        Ok(created)
    }

    /// 列出全部购物请求（按创建时间倒序）
    pub async fn list(&self) -> AppResult<Vec<ShoppingRequest>> {
        let requests = sqlx::query_as::<_, ShoppingRequest>(
            r#"
            SELECT request_id, shopify_user_id, query, created_at, updated_at
            FROM requests
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(requests)
    }

    /// 根据ID查询购物请求
    pub async fn find_by_id(&self, request_id: Uuid) -> AppResult<Option<ShoppingRequest>> {
        let request = sqlx::query_as::<_, ShoppingRequest>(
            r#"
            SELECT request_id, shopify_user_id, query, created_at, updated_at
            FROM requests
            WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(request)
    }

    /// 检查购物请求是否存在
    pub async fn exists(&self, request_id: Uuid) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM requests WHERE request_id = $1",
        )
        .bind(request_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(count > 0)
    }

    /// 部分更新购物请求，返回更新后的行
    pub async fn update(
        &self,
        request_id: Uuid,
        update: UpdateShoppingRequest,
    ) -> AppResult<Option<ShoppingRequest>> {
        let updated = sqlx::query_as::<_, ShoppingRequest>(
            r#"
            UPDATE requests
            SET shopify_user_id = COALESCE($2, shopify_user_id),
                query = COALESCE($3, query),
                updated_at = CURRENT_TIMESTAMP
            WHERE request_id = $1
            RETURNING request_id, shopify_user_id, query, created_at, updated_at
            "#,
        )
        .bind(request_id)
        .bind(update.shopify_user_id)
        .bind(update.query)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(updated)
    }

    /// 删除购物请求（购物车、标签、附件行级联删除）
    pub async fn delete(&self, request_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM requests WHERE request_id = $1")
            .bind(request_id)
            .execute(self.db.pool())
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("删除购物请求成功: {}", request_id);
        }
        Ok(deleted)
    }
}
