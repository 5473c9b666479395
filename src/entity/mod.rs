//! The agents that move through the maze and the logic that steers them.

pub mod behavior;
pub mod collision;
pub mod pathing;
pub mod player;
pub mod pursuer;
pub mod targeting;
