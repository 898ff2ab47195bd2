/// Running score plus the best score seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    score: u32,
    hi_score: u32,
}

impl ScoreTracker {
    pub fn new(hi_score: u32) -> Self {
        ScoreTracker { score: 0, hi_score }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hi_score(&self) -> u32 {
        self.hi_score
    }

    pub fn add(&mut self, delta: u32) {
        self.score = self.score.saturating_add(delta);
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }

    /// Whether the current score ties or beats the high score.
    pub fn reaches_high_score(&self) -> bool {
        self.score >= self.hi_score
    }

    /// Record the current score as the high score if it ties or beats it.
    /// Returns true when the high score was updated.
    pub fn commit_high_score(&mut self) -> bool {
        if self.reaches_high_score() {
            self.hi_score = self.score;
            true
        } else {
            false
        }
    }
}
