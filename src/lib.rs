pub mod ai;
pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod models;
