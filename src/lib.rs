//! Terminal client for the Vizzy chat backend
//!
//! Sends prompts in chat or image-generation mode to a remote `/chat`
//! endpoint and renders the text or image reply, tracking a client-side
//! session identifier across submissions.

pub mod api;
pub mod app;
pub mod client;
pub mod error;
pub mod media;
pub mod models;
pub mod render;
pub mod state;

pub use error::{Error, Result};
