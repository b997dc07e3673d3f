// src/store/mod.rs

pub mod database;
pub mod seed;

pub use database::{Database, Statistics};
