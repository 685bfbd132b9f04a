//! Good Badger - honorary supporter badges for the nonprofits you back
//!
//! Search the nonprofit registry, let a text model suggest honorary titles,
//! have an image model draw the badge, and render a shareable page. The same
//! [`services`] back both the HTTP API in [`server`] and the terminal
//! commands in [`cli`].

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod html;
pub mod output;
pub mod presenter;
pub mod server;
pub mod services;
pub mod storage;
pub mod workflow;

pub use error::{Error, Result};
