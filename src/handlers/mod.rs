// src/handlers/mod.rs

pub mod auth;
pub mod books;
pub mod interaction;
pub mod lending;
pub mod pickup;
pub mod profile;
