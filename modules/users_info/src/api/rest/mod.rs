pub mod controller;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
