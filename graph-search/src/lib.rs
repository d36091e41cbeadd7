mod models;
mod search_client;

pub use models::*;
pub use search_client::GraphSearchClient;
pub use search_client::GraphError;
pub use search_client::DEFAULT_BASE_URL;
