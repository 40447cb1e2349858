use crate::{
    models::{
        Cart, CartProduct, CreateCart, CreateCartProduct, CreateProduct, CreateRequestAsset,
        CreateRequestTag, CreateShoppingRequest, Product, RequestAsset, RequestAssetResponse,
        RequestTag, ShoppingRequest, SignedUrlResponse, UpdateCart, UpdateProduct,
        UpdateRequestAsset, UpdateShoppingRequest,
    },
    response::ApiResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // 购物请求API
        crate::handlers::requests::create_request,
        crate::handlers::requests::list_requests,
        crate::handlers::requests::get_request,
        crate::handlers::requests::update_request,
        crate::handlers::requests::delete_request,
        // 购物车API
        crate::handlers::carts::create_cart,
        crate::handlers::carts::list_carts,
        crate::handlers::carts::get_cart,
        crate::handlers::carts::update_cart,
        crate::handlers::carts::delete_cart,
        // 商品API
        crate::handlers::products::create_product,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        // 购物车-商品关联API
        crate::handlers::cart_products::create_cart_product,
        crate::handlers::cart_products::list_cart_products,
        crate::handlers::cart_products::get_cart_product,
        crate::handlers::cart_products::delete_cart_product,
        // 标签API
        crate::handlers::request_tags::create_request_tag,
        crate::handlers::request_tags::list_request_tags,
        crate::handlers::request_tags::get_request_tag,
        crate::handlers::request_tags::delete_request_tag,
        // 附件API
        crate::handlers::request_assets::upload_request_asset,
        crate::handlers::request_assets::create_request_asset,
        crate::handlers::request_assets::list_request_assets,
        crate::handlers::request_assets::get_request_asset,
        crate::handlers::request_assets::update_request_asset,
        crate::handlers::request_assets::delete_request_asset,
        crate::handlers::request_assets::get_request_asset_signed_url,
    ),
    components(
        schemas(
            // 购物请求相关模型
            ShoppingRequest,
            CreateShoppingRequest,
            UpdateShoppingRequest,
            // 购物车相关模型
            Cart,
            CreateCart,
            UpdateCart,
            // 商品相关模型
            Product,
            CreateProduct,
            UpdateProduct,
            // 关联与标签模型
            CartProduct,
            CreateCartProduct,
            RequestTag,
            CreateRequestTag,
            // 附件相关模型
            RequestAsset,
            RequestAssetResponse,
            CreateRequestAsset,
            UpdateRequestAsset,
            SignedUrlResponse,
            // 通用响应模型
            ApiResponse<ShoppingRequest>,
            ApiResponse<Cart>,
            ApiResponse<Product>,
            ApiResponse<CartProduct>,
            ApiResponse<RequestTag>,
            ApiResponse<RequestAssetResponse>,
            ApiResponse<SignedUrlResponse>,
            ApiResponse<String>,
        )
    ),
    tags(
        (name = "requests", description = "购物请求的创建、查询与管理"),
        (name = "carts", description = "购物车的创建、查询与管理"),
        (name = "products", description = "商品的创建、查询与管理"),
        (name = "cart-products", description = "购物车与商品的关联管理"),
        (name = "request-tags", description = "购物请求标签管理"),
        (name = "request-assets", description = "购物请求附件的上传、URL解析与管理")
    ),
    info(
        title = "GoCart API",
        version = "1.0.0",
        description = "GoCart 购物助手后端 REST API 文档",
        contact(
            name = "GoCart Team",
            email = "contact@example.com"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "开发环境")
    )
)]
pub struct ApiDoc;
