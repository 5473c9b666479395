use glam::IVec2;

use crate::entity::targeting::Archetype;

/// Something that happened during a round tick, for the outer controller to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    PelletCollected { cell: IVec2 },
    /// Every pursuer outside the pen has been frightened.
    PowerPelletCollected { cell: IVec2 },
    /// The player touched a frightened pursuer, which has been sent back to the pen.
    PursuerEaten(Archetype),
    /// The player touched a pursuer that was not frightened. The rest of the tick is skipped.
    PlayerCaught(Archetype),
    /// The last item was collected.
    MazeCleared,
}
