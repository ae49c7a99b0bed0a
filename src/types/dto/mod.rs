// Wire types - poem-openapi request and response objects
pub mod admin;
pub mod auth;
pub mod common;
pub mod tickets;
