pub mod middleware;
pub mod problem;
pub mod request_id;
