mod envelope;
mod filters;
mod search_request;
mod search_response;

pub use envelope::*;
pub use filters::*;
pub use search_request::*;
pub use search_response::*;
