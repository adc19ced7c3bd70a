pub mod aladhan;
mod http_client;
mod http_handler_common;
pub mod http_request;
pub mod http_response;

pub use aladhan::AladhanProvider;
pub use http_client::HTTPClient;
pub use http_handler_common::HTTPError;
