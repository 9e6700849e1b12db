mod error;
pub use error::ApiError;

mod handler;
pub use handler::ApiHandler;

mod adapter;
pub use adapter::StoreHandler;

mod http;
pub use http::HttpApi;
