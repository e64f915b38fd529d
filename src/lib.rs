pub mod api;
pub mod bootstrap;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
