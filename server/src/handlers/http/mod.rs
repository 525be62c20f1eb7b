pub mod auth;
pub mod dashboard;
pub mod routes;
pub mod utils;
