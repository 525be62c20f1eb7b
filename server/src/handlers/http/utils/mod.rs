pub mod headers;
pub mod json_response;
pub mod jwt;

pub use headers::*;
pub use json_response::*;
pub use jwt::*;
