pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod repository;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
