//! HTTP request handlers

pub mod admin;
pub mod chat;
pub mod health;
