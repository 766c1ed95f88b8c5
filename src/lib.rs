pub mod application;
pub mod commands;
pub mod counter;
pub mod http;
pub mod pagination;
pub mod runtime;
pub mod tmdb;
