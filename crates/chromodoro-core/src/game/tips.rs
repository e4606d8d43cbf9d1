//! Productivity tip catalog.
//!
//! Each tip unlocks when the player first reaches its level. Unlocks are
//! recorded on the game record by id and survive a round reset.

/// One unlockable tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    pub id: u32,
    pub unlock_level: u32,
    pub title: &'static str,
    pub text: &'static str,
}

pub const CATALOG: [Tip; 10] = [
    Tip {
        id: 1,
        unlock_level: 1,
        title: "Two-minute rule",
        text: "If a task takes under two minutes, do it now instead of adding it to the list.",
    },
    Tip {
        id: 2,
        unlock_level: 2,
        title: "One thing at a time",
        text: "Pick a single task before starting a focus session. Switching costs more than it feels.",
    },
    Tip {
        id: 3,
        unlock_level: 3,
        title: "Breaks are part of the work",
        text: "Step away from the screen during breaks. Your next session starts sharper.",
    },
    Tip {
        id: 4,
        unlock_level: 4,
        title: "Eat the frog",
        text: "Do the task you dread first. Everything after it feels lighter.",
    },
    Tip {
        id: 5,
        unlock_level: 5,
        title: "Write it down",
        text: "A thought that interrupts a session goes on the list, not into action.",
    },
    Tip {
        id: 6,
        unlock_level: 6,
        title: "Batch the small stuff",
        text: "Group emails, messages and chores into one session instead of scattering them.",
    },
    Tip {
        id: 7,
        unlock_level: 7,
        title: "Plan tomorrow tonight",
        text: "End the day by choosing tomorrow's first task. Mornings start faster with a decision already made.",
    },
    Tip {
        id: 8,
        unlock_level: 8,
        title: "Protect your streak",
        text: "Showing up daily beats occasional heroics. A short session still counts.",
    },
    Tip {
        id: 9,
        unlock_level: 9,
        title: "Review weekly",
        text: "Once a week, clear out stale tasks. A trustworthy list is one you actually look at.",
    },
    Tip {
        id: 10,
        unlock_level: 10,
        title: "Done beats perfect",
        text: "Ship the 90% version. Perfection is a form of procrastination.",
    },
];

/// The tip that unlocks at the given level, if any.
pub fn for_level(level: u32) -> Option<&'static Tip> {
    CATALOG.iter().find(|t| t.unlock_level == level)
}

pub fn by_id(id: u32) -> Option<&'static Tip> {
    CATALOG.iter().find(|t| t.id == id)
}
