/// Events emitted by a turn.
/// The presentation layer turns these into status messages and log lines.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The move changed nothing; no tile was spawned.
    NoChange,
    /// Points earned from merges this turn (only when > 0).
    TilesMerged { gained: u32 },
    TileSpawned { row: usize, col: usize, value: u32 },
    NewBestScore { score: u32 },
    SaveFailed { reason: String },
    GameOver,
}
