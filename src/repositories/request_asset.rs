use crate::database::Database;
use crate::error::AppResult;
use crate::models::{CreateRequestAsset, RequestAsset, UpdateRequestAsset};
use uuid::Uuid;

/// 购物请求附件数据访问层
///
/// 只负责存储键的持久化，不与存储后端交互。
#[derive(Clone)]
pub struct RequestAssetRepository {
    db: Database,
}

impl RequestAssetRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 登记附件记录
    pub async fn create(&self, asset: CreateRequestAsset) -> AppResult<RequestAsset> {
        let created = sqlx::query_as::<_, RequestAsset>(
            r#"
            INSERT INTO request_assets (request_asset_id, request_id, file_key)
            VALUES ($1, $2, $3)
            RETURNING request_asset_id, request_id, file_key, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(asset.request_id)
        .bind(&asset.file_key)
        .fetch_one(self.db.pool())
        .await?;

        tracing::info!(
            "登记附件成功: {} key={}",
            created.request_asset_id,
            created.file_key
        );
        Ok(created)
    }

    /// 列出全部附件（按创建时间倒序）
    pub async fn list(&self) -> AppResult<Vec<RequestAsset>> {
        let assets = sqlx::query_as::<_, RequestAsset>(
            r#"
            SELECT request_asset_id, request_id, file_key, created_at, updated_at
            FROM request_assets
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(assets)
    }

    /// 列出指定购物请求的附件
    pub async fn list_by_request(&self, request_id: Uuid) -> AppResult<Vec<RequestAsset>> {
        let assets = sqlx::query_as::<_, RequestAsset>(
            r#"
            SELECT request_asset_id, request_id, file_key, created_at, updated_at
            FROM request_assets
            WHERE request_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(request_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(assets)
    }

    /// 根据ID查询附件
    pub async fn find_by_id(&self, request_asset_id: Uuid) -> AppResult<Option<RequestAsset>> {
        let asset = sqlx::query_as::<_, RequestAsset>(
            r#"
            SELECT request_asset_id, request_id, file_key, created_at, updated_at
            FROM request_assets
            WHERE request_asset_id = $1
            "#,
        )
        .bind(request_asset_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(asset)
    }

    /// 部分更新附件，返回更新后的行
    pub async fn update(
        &self,
        request_asset_id: Uuid,
        update: UpdateRequestAsset,
    ) -> AppResult<Option<RequestAsset>> {
        let updated = sqlx::query_as::<_, RequestAsset>(
            r#"
            UPDATE request_assets
            SET request_id = COALESCE($2, request_id),
                file_key = COALESCE($3, file_key),
                updated_at = CURRENT_TIMESTAMP
            WHERE request_asset_id = $1
            RETURNING request_asset_id, request_id, file_key, created_at, updated_at
            "#,
        )
        .bind(request_asset_id)
        .bind(update.request_id)
        .bind(update.file_key)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(updated)
    }

    /// 删除附件记录（不触碰存储后端）
    pub async fn delete(&self, request_asset_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM request_assets WHERE request_asset_id = $1")
            .bind(request_asset_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
