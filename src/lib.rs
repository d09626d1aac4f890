//! Berth: an interactive terminal dashboard for a Docker or Podman engine.
//!
//! This library exposes the core modules for use by the binary and by tests.

pub mod app;
pub mod config;
pub mod dispatcher;
pub mod docker;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod view;
