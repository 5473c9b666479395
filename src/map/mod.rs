//! This module defines the maze grid and provides functions for interacting with it.

pub mod builder;
pub mod direction;
pub mod grid;
pub mod parser;
