mod error_info;
mod search_request;
mod search_response;

pub use error_info::GraphErrorInfo;
pub use search_request::*;
pub use search_response::*;
