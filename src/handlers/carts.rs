use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::{Cart, CreateCart, UpdateCart};
use crate::repositories::CartRepository;
use crate::response::ApiResponse;
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

/// 创建购物车
#[utoipa::path(
    post,
    path = "/carts/",
    tag = "carts",
    request_body = CreateCart,
    responses(
        (status = 200, description = "创建成功", body = Cart),
        (status = 400, description = "请求参数错误"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn create_cart(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCart>,
) -> Result<Json<ApiResponse<Cart>>, AppError> {
    if payload.shopify_user_id.trim().is_empty() {
        return Err(AppError::bad_request("shopify_user_id不能为空"));
    }

    let repository = CartRepository::new(app_state.database.clone());
    let created = repository.create(payload).await.map_err(reject_missing_request)?;

    Ok(Json(ApiResponse::success(created)))
}

/// 列出全部购物车
#[utoipa::path(
    get,
    path = "/carts/",
    tag = "carts",
    responses(
        (status = 200, description = "查询成功", body = Vec<Cart>),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn list_carts(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Cart>>>, AppError> {
    let repository = CartRepository::new(app_state.database.clone());
    let carts = repository.list().await?;

    Ok(Json(ApiResponse::success(carts)))
}

/// 查询购物车详情
#[utoipa::path(
    get,
    path = "/carts/{cart_id}",
    tag = "carts",
    params(
        ("cart_id" = Uuid, Path, description = "购物车ID")
    ),
    responses(
        (status = 200, description = "查询成功", body = Cart),
        (status = 404, description = "购物车不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn get_cart(
    State(app_state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Cart>>, AppError> {
    let repository = CartRepository::new(app_state.database.clone());
    let cart = repository
        .find_by_id(cart_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("购物车 {}", cart_id)))?;

    Ok(Json(ApiResponse::success(cart)))
}

/// 更新购物车
#[utoipa::path(
    put,
    path = "/carts/{cart_id}",
    tag = "carts",
    params(
        ("cart_id" = Uuid, Path, description = "购物车ID")
    ),
    request_body = UpdateCart,
    responses(
        (status = 200, description = "更新成功", body = Cart),
        (status = 400, description = "目标购物请求不存在"),
        (status = 404, description = "购物车不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn update_cart(
    State(app_state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    Json(payload): Json<UpdateCart>,
) -> Result<Json<ApiResponse<Cart>>, AppError> {
    let repository = CartRepository::new(app_state.database.clone());
    let updated = repository
        .update(cart_id, payload)
        .await
        .map_err(reject_missing_request)?
        .ok_or_else(|| AppError::not_found(format!("购物车 {}", cart_id)))?;

    Ok(Json(ApiResponse::success(updated)))
}

/// 删除购物车
#[utoipa::path(
    delete,
    path = "/carts/{cart_id}",
    tag = "carts",
    params(
        ("cart_id" = Uuid, Path, description = "购物车ID")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "购物车不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn delete_cart(
    State(app_state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let repository = CartRepository::new(app_state.database.clone());
    let deleted = repository.delete(cart_id).await?;

    if !deleted {
        return Err(AppError::not_found(format!("购物车 {}", cart_id)));
    }

    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 外键违例转换为参数错误
///
/// request_id指向不存在的购物请求时，数据库返回外键违例，
/// 对客户端而言属于请求参数错误而非服务端故障。
fn reject_missing_request(err: AppError) -> AppError {
    if let AppError::Database(sqlx::Error::Database(db_err)) = &err {
        if db_err.is_foreign_key_violation() {
            return AppError::bad_request("指定的购物请求不存在");
        }
    }
    err
}
