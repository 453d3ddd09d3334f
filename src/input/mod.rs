// src/input/mod.rs
pub mod archive;
pub mod reader;
