//! Render process and thread listings as ASCII trees

pub mod app;
pub mod cli;
pub mod config;
pub mod directory;
pub mod extension;
pub mod prelude;
pub mod tree;
