//! Integration test modules

mod advisor;
mod audit;
mod config;
