use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::{CreateShoppingRequest, ShoppingRequest, UpdateShoppingRequest};
use crate::repositories::RequestRepository;
use crate::response::ApiResponse;
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

/// 创建购物请求
#[utoipa::path(
    post,
    path = "/requests/",
    tag = "requests",
    request_body = CreateShoppingRequest,
    responses(
        (status = 200, description = "创建成功", body = ShoppingRequest),
        (status = 400, description = "请求参数错误"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateShoppingRequest>,
) -> Result<Json<ApiResponse<ShoppingRequest>>, AppError> {
    if payload.shopify_user_id.trim().is_empty() {
        return Err(AppError::bad_request("shopify_user_id不能为空"));
    }
    if payload.query.trim().is_empty() {
        return Err(AppError::bad_request("query不能为空"));
    }

    let repository = RequestRepository::new(app_state.database.clone());
    let created = repository.create(payload).await?;

    Ok(Json(ApiResponse::success(created)))
}

/// 列出全部购物请求
#[utoipa::path(
    get,
    path = "/requests/",
    tag = "requests",
    responses(
        (status = 200, description = "查询成功", body = Vec<ShoppingRequest>),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ShoppingRequest>>>, AppError> {
    let repository = RequestRepository::new(app_state.database.clone());
    let requests = repository.list().await?;

    Ok(Json(ApiResponse::success(requests)))
}

/// 查询购物请求详情
#[utoipa::path(
    get,
    path = "/requests/{request_id}",
    tag = "requests",
    params(
        ("request_id" = Uuid, Path, description = "购物请求ID")
    ),
    responses(
        (status = 200, description = "查询成功", body = ShoppingRequest),
        (status = 404, description = "购物请求不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn get_request(
    State(app_state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ShoppingRequest>>, AppError> {
    let repository = RequestRepository::new(app_state.database.clone());
    let request = repository
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("购物请求 {}", request_id)))?;

    Ok(Json(ApiResponse::success(request)))
}

/// 更新购物请求
#[utoipa::path(
    put,
    path = "/requests/{request_id}",
    tag = "requests",
    params(
        ("request_id" = Uuid, Path, description = "购物请求ID")
    ),
    request_body = UpdateShoppingRequest,
    responses(
        (status = 200, description = "更新成功", body = ShoppingRequest),
        (status = 404, description = "购物请求不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn update_request(
    State(app_state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<UpdateShoppingRequest>,
) -> Result<Json<ApiResponse<ShoppingRequest>>, AppError> {
    let repository = RequestRepository::new(app_state.database.clone());
    let updated = repository
        .update(request_id, payload)
        .await?
        .ok_or_else(|| AppError::not_found(format!("购物请求 {}", request_id)))?;

    Ok(Json(ApiResponse::success(updated)))
}

/// 删除购物请求
///
/// 关联的购物车、标签与附件记录一并级联删除；附件对应的存储对象
/// 不在此处清理，由附件删除接口负责。
#[utoipa::path(
    delete,
    path = "/requests/{request_id}",
    tag = "requests",
    params(
        ("request_id" = Uuid, Path, description = "购物请求ID")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "购物请求不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn delete_request(
    State(app_state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let repository = RequestRepository::new(app_state.database.clone());
    let deleted = repository.delete(request_id).await?;

    if !deleted {
        return Err(AppError::not_found(format!("购物请求 {}", request_id)));
    }

    Ok(Json(ApiResponse::<()>::success_empty()))
}
