use std::fmt;
use std::str::FromStr;

/// Hand-built 4×4 boards for demos and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Every row holds two equal pairs, ending with an unmergeable pair of 2048s.
    MergeShowcase,
    /// One free cell and no merges left; any sliding move fills the board and ends the game.
    EndGame,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::MergeShowcase, Scenario::EndGame];

    /// Row-major exponents, `0` meaning empty.
    pub fn rows(self) -> [[u8; 4]; 4] {
        match self {
            Scenario::MergeShowcase => [
                [4, 4, 5, 5],
                [6, 6, 7, 7],
                [8, 8, 9, 9],
                [10, 10, 11, 11],
            ],
            Scenario::EndGame => [
                [3, 4, 3, 4],
                [5, 6, 5, 6],
                [7, 8, 7, 8],
                [9, 10, 9, 0],
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::MergeShowcase => "merge-showcase",
            Scenario::EndGame => "end-game",
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown scenario '{}' (expected 'merge-showcase' or 'end-game')",
                    s
                )
            })
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
