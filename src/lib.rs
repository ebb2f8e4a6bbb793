pub mod app_state;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod entities;
pub mod events;
pub mod health;
pub mod items;
pub mod middleware;
pub mod passwords;
pub mod profiles;
pub mod repositories;
pub mod rooms;
pub mod router;
