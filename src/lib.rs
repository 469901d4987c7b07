pub mod database;
pub mod models;
pub mod search;
pub mod services;
pub mod web;
