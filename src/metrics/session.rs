/// Session-wide counters that survive round restarts.
///
/// Owned by the play mode and passed into rendering explicitly; the high
/// score lives here rather than in `GameState` so replacing the state on
/// restart cannot reset it.
#[derive(Debug, Clone, Default)]
pub struct SessionMetrics {
    pub high_score: u32,
    pub rounds_played: u32,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the high score when the current score exceeds it; never
    /// lowers it
    pub fn observe_score(&mut self, score: u32) {
        if score > self.high_score {
            self.high_score = score;
        }
    }

    pub fn on_round_over(&mut self) {
        self.rounds_played += 1;
    }
}
