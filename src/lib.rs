//! Saudi reserves showcase engine.
//!
//! A fixed catalog of natural and royal reserves, a map with type and region
//! filters, per-reserve detail screens with a drag-pan tour, a booking form
//! stub and an AI guide chat backed by Gemini.

pub mod app;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod dev_mode;
pub mod filter;
pub mod guide;
pub mod logging;
pub mod map;
pub mod model;
pub mod navigator;
pub mod panorama;
pub mod render;
pub mod verify;
