use crate::handlers::{
    AppState,
    create_cart,
    create_cart_product,
    create_product,
    create_request,
    create_request_asset,
    create_request_tag,
    delete_cart,
    delete_cart_product,
    delete_product,
    delete_request,
    delete_request_asset,
    delete_request_tag,
    get_cart,
    get_cart_product,
    get_product,
    get_request,
    get_request_asset,
    get_request_asset_signed_url,
    get_request_tag,
    list_cart_products,
    list_carts,
    list_products,
    list_request_assets,
    list_request_tags,
    list_requests,
    update_cart,
    update_product,
    update_request,
    update_request_asset,
    upload_request_asset,
};
use axum::{
    Router,
    routing::{delete as axum_delete, get, post, put},
};

/// 创建API路由
pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        // 购物请求API
        .route("/requests/", post(create_request))
        .route("/requests/", get(list_requests))
        .route("/requests/{request_id}", get(get_request))
        .route("/requests/{request_id}", put(update_request))
        .route("/requests/{request_id}", axum_delete(delete_request))
        // 购物车API
        .route("/carts/", post(create_cart))
        .route("/carts/", get(list_carts))
        .route("/carts/{cart_id}", get(get_cart))
        .route("/carts/{cart_id}", put(update_cart))
        .route("/carts/{cart_id}", axum_delete(delete_cart))
        // 商品API
        .route("/products/", post(create_product))
        .route("/products/", get(list_products))
        .route("/products/{product_id}", get(get_product))
        .route("/products/{product_id}", put(update_product))
        .route("/products/{product_id}", axum_delete(delete_product))
        // 购物车-商品关联API（复合主键）
        .route("/cart-products/", post(create_cart_product))
        .route("/cart-products/", get(list_cart_products))
        .route("/cart-products/{cart_id}/{product_id}", get(get_cart_product))
        .route(
            "/cart-products/{cart_id}/{product_id}",
            axum_delete(delete_cart_product),
        )
        // 购物请求标签API（复合主键）
        .route("/request-tags/", post(create_request_tag))
        .route("/request-tags/", get(list_request_tags))
        .route("/request-tags/{tag_value}/{request_id}", get(get_request_tag))
        .route(
            "/request-tags/{tag_value}/{request_id}",
            axum_delete(delete_request_tag),
        )
        // 购物请求附件API（文件上传走存储后端）
        .route("/request-assets/upload", post(upload_request_asset))
        .route("/request-assets/", post(create_request_asset))
        .route("/request-assets/", get(list_request_assets))
        .route("/request-assets/{request_asset_id}", get(get_request_asset))
        .route("/request-assets/{request_asset_id}", put(update_request_asset))
        .route(
            "/request-assets/{request_asset_id}",
            axum_delete(delete_request_asset),
        )
        .route(
            "/request-assets/{request_asset_id}/signed-url",
            get(get_request_asset_signed_url),
        )
}
