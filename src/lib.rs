//! Temporary short links that expire after a number of clicks or days
//!
//! This module exposes internal components for testing and potential library usage.

pub mod config;
pub mod database;
pub mod error;
pub mod frontend;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod service;
pub mod state;
