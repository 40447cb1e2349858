pub mod cart_products;
pub mod carts;
pub mod products;
pub mod request_assets;
pub mod request_tags;
pub mod requests;

use crate::config::Config;
use crate::database::Database;
use crate::storage::AssetStorage;
use std::sync::Arc;

/// 应用共享状态
///
/// 存储后端在启动时选定一次，之后所有请求共用同一个实例。
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub storage: Arc<dyn AssetStorage>,
    pub config: Config,
}

pub use cart_products::{create_cart_product, delete_cart_product, get_cart_product, list_cart_products};
pub use carts::{create_cart, delete_cart, get_cart, list_carts, update_cart};
pub use products::{create_product, delete_product, get_product, list_products, update_product};
pub use request_assets::{
    create_request_asset, delete_request_asset, get_request_asset, get_request_asset_signed_url,
    list_request_assets, update_request_asset, upload_request_asset,
};
pub use request_tags::{create_request_tag, delete_request_tag, get_request_tag, list_request_tags};
pub use requests::{create_request, delete_request, get_request, list_requests, update_request};
