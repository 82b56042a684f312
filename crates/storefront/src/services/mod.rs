//! Work shared by several route modules.

pub mod images;
pub mod preview;
