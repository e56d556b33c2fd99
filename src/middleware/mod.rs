pub mod response;
pub mod store;

pub use response::{ApiResponse, ApiResult};
pub use store::ProductStore;
