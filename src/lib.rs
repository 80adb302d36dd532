//! Placepin - Backend API for a social place-sharing app
//!
//! This library provides the core functionality for the Placepin service:
//! place boards with images, nested comments, likes and bookmarks, plus a
//! full user subsystem (signup, social login, friends, recommendations).
//!
//! # Architecture
//! - `api`: HTTP services, JWT and middleware
//! - `services`: Business logic shared between HTTP handlers and the CLI
//! - `storage`: SeaORM storage backend and data access
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and system utilities

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
