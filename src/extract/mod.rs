//! Page text extraction through an external scraping service

pub mod client;

pub use client::ExtractionClient;
