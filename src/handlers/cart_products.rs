use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::{CartProduct, CreateCartProduct};
use crate::repositories::CartProductRepository;
use crate::response::ApiResponse;
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

/// 建立购物车-商品关联
#[utoipa::path(
    post,
    path = "/cart-products/",
    tag = "cart-products",
    request_body = CreateCartProduct,
    responses(
        (status = 200, description = "创建成功", body = CartProduct),
        (status = 400, description = "购物车或商品不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn create_cart_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCartProduct>,
) -> Result<Json<ApiResponse<CartProduct>>, AppError> {
    let repository = CartProductRepository::new(app_state.database.clone());
    let created = repository.create(payload).await.map_err(|err| {
        if let AppError::Database(sqlx::Error::Database(db_err)) = &err {
            if db_err.is_foreign_key_violation() {
                return AppError::bad_request("指定的购物车或商品不存在");
            }
            if db_err.is_unique_violation() {
                return AppError::bad_request("该商品已在购物车中");
            }
        }
        err
    })?;

    Ok(Json(ApiResponse::success(created)))
}

/// 列出全部购物车-商品关联
#[utoipa::path(
    get,
    path = "/cart-products/",
    tag = "cart-products",
    responses(
        (status = 200, description = "查询成功", body = Vec<CartProduct>),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn list_cart_products(
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CartProduct>>>, AppError> {
    let repository = CartProductRepository::new(app_state.database.clone());
    let links = repository.list().await?;

    Ok(Json(ApiResponse::success(links)))
}

/// 查询购物车-商品关联详情
#[utoipa::path(
    get,
    path = "/cart-products/{cart_id}/{product_id}",
    tag = "cart-products",
    params(
        ("cart_id" = Uuid, Path, description = "购物车ID"),
        ("product_id" = Uuid, Path, description = "商品ID")
    ),
    responses(
        (status = 200, description = "查询成功", body = CartProduct),
        (status = 404, description = "关联不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn get_cart_product(
    State(app_state): State<AppState>,
    Path((cart_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<CartProduct>>, AppError> {
    let repository = CartProductRepository::new(app_state.database.clone());
    let link = repository
        .find(cart_id, product_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("购物车商品关联 {}/{}", cart_id, product_id))
        })?;

    Ok(Json(ApiResponse::success(link)))
}

/// 解除购物车-商品关联
#[utoipa::path(
    delete,
    path = "/cart-products/{cart_id}/{product_id}",
    tag = "cart-products",
    params(
        ("cart_id" = Uuid, Path, description = "购物车ID"),
        ("product_id" = Uuid, Path, description = "商品ID")
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "关联不存在"),
        (status = 500, description = "服务器内部错误")
    )
)]
pub async fn delete_cart_product(
    State(app_state): State<AppState>,
    Path((cart_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let repository = CartProductRepository::new(app_state.database.clone());
    let deleted = repository.delete(cart_id, product_id).await?;

    if !deleted {
        return Err(AppError::not_found(format!(
            "购物车商品关联 {}/{}",
            cart_id, product_id
        )));
    }

    Ok(Json(ApiResponse::<()>::success_empty()))
}
