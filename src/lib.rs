pub mod casafari;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod logger;
pub mod models;
pub mod producer;
pub mod sync;
