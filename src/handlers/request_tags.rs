use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::{CreateRequestTag, RequestTag};
use crate::repositories::RequestTagRepository;
use crate::response::ApiResponse;
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

/// 为购物请求打标签
#[utoipa::path(
    post,
    path = "/request-tags/",
    tag = "request-tags",
    request_body = CreateRequestTag,
    responses(
        (status = 200, description = "创建成功", body = RequestTag),
        (status = 400, description = "标签为空或购物请求不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn create_request_tag(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateRequestTag>,
) -> Result<Json<ApiResponse<RequestTag>>, AppError> {
    if payload.tag_value.trim().is_empty() {
        return Err(AppError::bad_request("tag_value不能为空"));
    }

    let repository = RequestTagRepository::new(app_state.database.clone());
    let created = repository.create(payload).await.map_err(|err| {
        if let AppError::Database(sqlx::Error::Database(db_err)) = &err {
            if db_err.is_foreign_key_violation() {
                return AppError::bad_request("指定的购物请求不存在");
            }
            if db_err.is_unique_violation() {
                return AppError::bad_request("该标签已存在");
            }
        }
        err
    })?;

    Ok(Json(ApiResponse::success(created)))
}

/// 列出全部标签
#[utoipa::path(
    get,
    path = "/request-tags/",
    tag = "request-tags",
    responses(
        (status = 200, description = "查询成功", body = Vec<RequestTag>),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn list_request_tags(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RequestTag>>>, AppError> {
    let repository = RequestTagRepository::new(app_state.database.clone());
    let tags = repository.list().await?;

    Ok(Json(ApiResponse::success(tags)))
}

/// 查询标签详情
#[utoipa::path(
    get,
    path = "/request-tags/{tag_value}/{request_id}",
    tag = "request-tags",
    params(
        ("tag_value" = String, Path, description = "标签值"),
        ("request_id" = Uuid, Path, description = "购物请求ID")
    ),
    responses(
        (status = 200, description = "查询成功", body = RequestTag),
        (status = 404, description = "标签不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn get_request_tag(
    State(app_state): State<AppState>,
    Path((tag_value, request_id)): Path<(String, Uuid)>,
) -> Result<Json<ApiResponse<RequestTag>>, AppError> {
    let repository = RequestTagRepository::new(app_state.database.clone());
    let tag = repository
        .find(&tag_value, request_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("标签 {}/{}", tag_value, request_id)))?;

    Ok(Json(ApiResponse::success(tag)))
}

/// 删除标签
#[utoipa::path(
    delete,
    path = "/request-tags/{tag_value}/{request_id}",
    tag = "request-tags",
    params(
        ("tag_value" = String, Path, description = "标签值"),
        ("request_id" = Uuid, Path, description = "购物请求ID")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "标签不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn delete_request_tag(
    State(app_state): State<AppState>,
    Path((tag_value, request_id)): Path<(String, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let repository = RequestTagRepository::new(app_state.database.clone());
    let deleted = repository.delete(&tag_value, request_id).await?;

    if !deleted {
        return Err(AppError::not_found(format!(
            "标签 {}/{}",
            tag_value, request_id
        )));
    }

    Ok(Json(ApiResponse::<()>::success_empty()))
}
