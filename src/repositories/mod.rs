pub mod cart;
pub mod cart_product;
pub mod product;
pub mod request;
pub mod request_asset;
pub mod request_tag;

pub use cart::CartRepository;
pub use cart_product::CartProductRepository;
pub use product::ProductRepository;
pub use request::RequestRepository;
pub use request_asset::RequestAssetRepository;
pub use request_tag::RequestTagRepository;
