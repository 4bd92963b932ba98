pub mod config;
pub mod database;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod store;
pub mod subscription;
pub mod swagger;
pub mod utils;

pub use config::Config;
pub use error::{AppError, AppResult};
