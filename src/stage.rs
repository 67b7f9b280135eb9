/// Ceiling on wrong guesses; reaching it loses the round.
pub const MAX_WRONG_GUESSES: usize = 6;

/// One step of the gallows figure, revealed per wrong guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Head,
    Torso,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

/// Drawing order, indexed by wrong-guess count minus one.
const STAGES: [Stage; MAX_WRONG_GUESSES] = [
    Stage::Head,
    Stage::Torso,
    Stage::RightArm,
    Stage::LeftArm,
    Stage::RightLeg,
    Stage::LeftLeg,
];

impl Stage {
    /// Stage revealed by the given wrong-guess count (1..=6).
    pub fn for_wrong_guess(count: usize) -> Option<Stage> {
        if count == 0 {
            return None;
        }
        STAGES.get(count - 1).copied()
    }

    /// Position in the drawing order, 1..=6.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Head => "head",
            Stage::Torso => "torso",
            Stage::RightArm => "right arm",
            Stage::LeftArm => "left arm",
            Stage::RightLeg => "right leg",
            Stage::LeftLeg => "left leg",
        }
    }
}
