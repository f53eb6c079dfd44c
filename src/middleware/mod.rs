pub mod identity;
pub mod json;
pub mod request_id;

pub use identity::{AccountId, ACCOUNT_ID_HEADER};
pub use json::ApiJson;
pub use request_id::{make_span_with_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};
