//! Fixed XP rewards per activity.

/// XP granted for each kind of learning activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpTable {
    pub intro_read: u64,
    pub concept_read: u64,
    pub simulation_success: u64,
    pub local_practice: u64,
    pub checkpoint_correct: u64,
    pub chapter_complete: u64,
    pub daily_challenge: u64,
    pub quest_complete: u64,
}

pub const XP_TABLE: XpTable = XpTable {
    intro_read: 5,
    concept_read: 10,
    simulation_success: 20,
    local_practice: 30,
    checkpoint_correct: 30,
    chapter_complete: 100,
    daily_challenge: 50,
    quest_complete: 200,
};
