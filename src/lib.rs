//! hxpatch - Byte patcher built on a canonical hex dump
//!
//! This library provides shared functionality for hxpatch (interactive patcher) and hxdump (pipe tool).

pub mod app;
pub mod buffer;
pub mod logging;
pub mod ui;
