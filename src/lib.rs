pub mod api_docs;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod rabbitmq_service;
pub mod redis_service;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod static_service;
pub mod utils;
