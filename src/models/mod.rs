// src/models/mod.rs

pub mod book;
pub mod review;
pub mod user;
