pub mod config;
pub mod logging;

pub mod cache;
pub mod checksum;
pub mod links;
pub mod manifest;
pub mod pack;
pub mod registry;
pub mod state;
pub mod sync;
pub mod trigger;
