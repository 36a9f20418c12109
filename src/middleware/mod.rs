pub mod auth;
pub mod request;
pub mod response;

pub use auth::AuthUser;
pub use request::{parse_record_id, RecordId, ValidJson};
pub use response::{ApiResponse, ApiResult};
