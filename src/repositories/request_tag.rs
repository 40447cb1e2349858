use crate::database::Database;
use crate::error::AppResult;
use crate::models::{CreateRequestTag, RequestTag};
use uuid::Uuid;

/// 购物请求标签数据访问层
#[derive(Clone)]
pub struct RequestTagRepository {
    db: Database,
}

impl RequestTagRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 为购物请求打标签（request_id外键约束校验存在性）
    pub async fn create(&self, tag: CreateRequestTag) -> AppResult<RequestTag> {
        let created = sqlx::query_as::<_, RequestTag>(
            r#"
            INSERT INTO request_tags (tag_value, request_id)
            VALUES ($1, $2)
            RETURNING tag_value, request_id, created_at, updated_at
            "#,
        )
        .bind(&tag.tag_value)
        .bind(tag.request_id)
        .fetch_one(self.db.pool())
        .await?;

        tracing::info!(
            "创建标签成功: {} -> {}",
            created.tag_value,
            created.request_id
        );
        Ok(created)
    }

    /// 列出全部标签
    pub async fn list(&self) -> AppResult<Vec<RequestTag>> {
        let tags = sqlx::query_as::<_, RequestTag>(
            r#"
            SELECT tag_value, request_id, created_at, updated_at
            FROM request_tags
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(tags)
    }

    /// 根据复合主键查询标签
    pub async fn find(&self, tag_value: &str, request_id: Uuid) -> AppResult<Option<RequestTag>> {
        let tag = sqlx::query_as::<_, RequestTag>(
            r#"
            SELECT tag_value, request_id, created_at, updated_at
            FROM request_tags
            WHERE tag_value = $1 AND request_id = $2
            "#,
        )
        .bind(tag_value)
        .bind(request_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(tag)
    }

    /// 删除标签
    pub async fn delete(&self, tag_value: &str, request_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM request_tags WHERE tag_value = $1 AND request_id = $2")
                .bind(tag_value)
                .bind(request_id)
                .execute(self.db.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
