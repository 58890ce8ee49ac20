//! HTTP API handlers

pub mod generate;
pub mod health;
pub mod images;
pub mod lifecycle;
pub mod tags;
