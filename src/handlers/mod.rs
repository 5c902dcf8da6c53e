//! HTTP Handlers

pub mod users;
