pub mod auth_jwt;
pub mod config;
pub mod db;
pub mod db_models;
pub mod domain;
pub mod dto;
pub mod errors;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod startup;
pub mod state;
pub mod telemetry;
pub mod validations;
