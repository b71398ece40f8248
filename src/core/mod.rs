//! Core translation engine module

pub mod cache;
pub mod config;
pub mod errors;
pub mod pipeline;
