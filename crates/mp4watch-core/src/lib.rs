pub mod config;
pub mod logging;

pub mod classify;
pub mod clock;
pub mod download;
pub mod headers;
pub mod pipeline;
pub mod registry;
pub mod replay;
