#![forbid(unsafe_code)]

//! Terminal host for the termboot boot screen.
//!
//! Parses options, wires the runtime to the wall clock, and paints widget
//! buffers through crossterm.

pub mod app;
pub mod cli;
pub mod logging;
pub mod paint;
