//! Cycling route planner server.
//!
//! A web application that answers: "if I ride from here to there and stop
//! every N minutes, where can I park my bicycle?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod onemap;
pub mod parking;
pub mod planner;
pub mod web;
