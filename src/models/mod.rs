pub mod cart;
pub mod cart_product;
pub mod product;
pub mod request;
pub mod request_asset;
pub mod request_tag;

pub use cart::*;
pub use cart_product::*;
pub use product::*;
pub use request::*;
pub use request_asset::*;
pub use request_tag::*;
