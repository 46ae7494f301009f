//! Application pieces for the vidchute binary. The router is built here so
//! tests can drive the app in-process without binding a socket.

pub mod app;
pub mod pages;

mod body;
mod error;
