//! parktrack - Track visited US national parks from the command line

pub mod api;
pub mod config;
pub mod domain;
pub mod geo;
pub mod store;
