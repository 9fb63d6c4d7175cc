//! HTTP façade: handlers, routes and middleware

pub mod middleware;
pub mod services;
