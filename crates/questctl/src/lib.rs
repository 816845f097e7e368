//! questctl library - exposes the command layer for testing

pub mod app;
pub mod checkpoint_cmd;
pub mod commands;
pub mod practice;
pub mod text;
pub mod ui;
