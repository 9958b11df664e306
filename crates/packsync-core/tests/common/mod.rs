#![allow(dead_code)]

pub mod pack_tree;
pub mod registry_server;
