//! PixelForge: a small pixel-art sprite editing engine.
//!
//! A [`Project`] holds same-sized frames, each a [`Sprite`] with its own
//! [`Canvas`] and undo history. Tools turn pointer input into
//! [`PixelAction`]s; the project file is JSON with base64 pixel payloads.

pub mod logger;

pub mod canvas;
pub mod cli;
pub mod components;
pub mod io;
pub mod ops;
pub mod project;
pub mod settings;

pub use canvas::Canvas;
pub use components::history::{ActionHistory, PixelAction, PixelChange};
pub use io::ProjectIoError;
pub use project::{Project, Sprite};
