pub mod app;
pub mod cli;
pub mod config;
pub mod listener;
pub mod models;
pub mod tasks;
