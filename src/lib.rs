//! Library entry for codepick exposing core logic for integration tests.

pub mod args;
pub mod config;
pub mod editor;
pub mod mru;
pub mod paths;
pub mod picker;
pub mod project;
pub mod util;
pub mod window;
