//! bitchain library — application logic for the matrix chain evaluator.

pub mod app;
pub mod config;
pub mod errors;
