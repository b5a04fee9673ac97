//! GalleryView - terminal edit mode for an art gallery server
//!
//! This crate provides the edit-mode core of a gallery front end: a
//! three-state mode controller, a selection set, a viewer gate and a
//! priority animation scheduler, plus a ratatui UI and an HTTP client
//! for the gallery's persistence API.

pub mod api;
pub mod app;
pub mod core;
pub mod error;
pub mod handler;
pub mod scheduler;
