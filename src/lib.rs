//! Agent simulation core for a maze-chase arcade game.

pub mod constants;
pub mod entity;
pub mod error;
pub mod game;
pub mod map;
