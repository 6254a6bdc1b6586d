//! Data models for documents, requests, scores and configuration.

pub mod config;
pub mod document;
pub mod score;
