// src/lib.rs

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod lending;
pub mod models;
pub mod notify;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use routes::create_router;
