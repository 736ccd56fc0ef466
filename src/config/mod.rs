// ABOUTME: Configuration module for environment-driven runtime settings
// ABOUTME: Re-exports the server configuration types loaded at startup
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Configuration management for the identity platform

pub mod environment;

pub use environment::{AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, ServerConfig};
