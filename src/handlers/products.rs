use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::{CreateProduct, Product, UpdateProduct};
use crate::repositories::ProductRepository;
use crate::response::ApiResponse;
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

/// 创建商品
#[utoipa::path(
    post,
    path = "/products/",
    tag = "products",
    request_body = CreateProduct,
    responses(
        (status = 200, description = "创建成功", body = Product),
        (status = 400, description = "请求参数错误"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProduct>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    if payload.shopify_product_id.trim().is_empty() {
        return Err(AppError::bad_request("shopify_product_id不能为空"));
    }
    if payload.shopify_variant_id.trim().is_empty() {
        return Err(AppError::bad_request("shopify_variant_id不能为空"));
    }

    let repository = ProductRepository::new(app_state.database.clone());
    let created = repository.create(payload).await?;

    Ok(Json(ApiResponse::success(created)))
}

/// 列出全部商品
#[utoipa::path(
    get,
    path = "/products/",
    tag = "products",
    responses(
        (status = 200, description = "查询成功", body = Vec<Product>),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let repository = ProductRepository::new(app_state.database.clone());
    let products = repository.list().await?;

    Ok(Json(ApiResponse::success(products)))
}

/// 查询商品详情
#[utoipa::path(
    get,
    path = "/products/{product_id}",
    tag = "products",
    params(
        ("product_id" = Uuid, Path, description = "商品ID")
    ),
    responses(
        (status = 200, description = "查询成功", body = Product),
        (status = 404, description = "商品不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let repository = ProductRepository::new(app_state.database.clone());
    let product = repository
        .find_by_id(product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("商品 {}", product_id)))?;

    Ok(Json(ApiResponse::success(product)))
}

/// 更新商品
#[utoipa::path(
    put,
    path = "/products/{product_id}",
    tag = "products",
    params(
        ("product_id" = Uuid, Path, description = "商品ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "更新成功", body = Product),
        (status = 404, description = "商品不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let repository = ProductRepository::new(app_state.database.clone());
    let updated = repository
        .update(product_id, payload)
        .await?
        .ok_or_else(|| AppError::not_found(format!("商品 {}", product_id)))?;

    Ok(Json(ApiResponse::success(updated)))
}

/// 删除商品
#[utoipa::path(
    delete,
    path = "/products/{product_id}",
    tag = "products",
    params(
        ("product_id" = Uuid, Path, description = "商品ID")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "商品不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let repository = ProductRepository::new(app_state.database.clone());
    let deleted = repository.delete(product_id).await?;

    if !deleted {
        return Err(AppError::not_found(format!("商品 {}", product_id)));
    }

    Ok(Json(ApiResponse::<()>::success_empty()))
}
