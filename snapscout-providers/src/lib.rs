pub mod parse;
pub mod request;
pub mod runtime;
pub mod shop_api;
