pub mod aggregate;
pub mod dtos;
pub mod handlers;
