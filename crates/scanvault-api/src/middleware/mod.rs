pub mod body_limit;
pub mod request_id;
pub mod security_headers;

pub use body_limit::payload_too_large_middleware;
pub use request_id::request_id_middleware;
