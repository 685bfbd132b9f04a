//! Operations behind both the HTTP routes and the CLI
//!
//! Each function takes its upstream client as a trait object and validates
//! caller input before any network call is made.

pub mod badge;
pub mod directory;
pub mod render;
pub mod titles;

pub use badge::{BadgeImage, generate_badge};
pub use directory::{SearchOutcome, lookup, search};
pub use render::{Palette, RenderedPage, SupportedNonprofit, render_page};
pub use titles::generate_titles;
