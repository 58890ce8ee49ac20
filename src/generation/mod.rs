//! Relay to the external node-graph generation backend

pub mod client;
pub mod graph;
