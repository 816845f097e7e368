//! Terminal UI strings for both locales.

use quest_shared::Locale;

pub struct Texts {
    pub terminal_title: &'static str,
    pub hint: &'static str,
    pub success: &'static str,
    pub try_again: &'static str,
    pub not_found: &'static str,
    pub step: &'static str,
    pub all_steps_done: &'static str,
    pub intro: &'static str,
    pub why: &'static str,
    pub goals: &'static str,
    pub before: &'static str,
    pub after: &'static str,
    pub local_practice: &'static str,
    pub checkpoint: &'static str,
    pub correct: &'static str,
    pub incorrect: &'static str,
    pub chapter_complete: &'static str,
    pub already_complete: &'static str,
    pub level: &'static str,
    pub chapters: &'static str,
    pub streak: &'static str,
    pub days: &'static str,
    pub badges: &'static str,
    pub level_up: &'static str,
    pub badge_earned: &'static str,
    pub xp_gained: &'static str,
    pub degraded: &'static str,
    pub chapter_missing: &'static str,
    pub next_chapter: &'static str,
}

const JA: Texts = Texts {
    terminal_title: "シミュレーションターミナル",
    hint: "ヒント",
    success: "✅ 正解！",
    try_again: "もう少し！ヒントを確認してみましょう",
    not_found: "コマンドが見つかりません",
    step: "ステップ",
    all_steps_done: "🎉 すべてのコマンド演習を完了しました！",
    intro: "この章の全体像",
    why: "なぜこれを学ぶのか",
    goals: "この章のゴール",
    before: "Before（この課題）",
    after: "After（Dockerで解決）",
    local_practice: "ローカルDockerで実践",
    checkpoint: "チェックポイント",
    correct: "正解！",
    incorrect: "不正解",
    chapter_complete: "🏆 章クリア！",
    already_complete: "この章はクリア済みです",
    level: "レベル",
    chapters: "章",
    streak: "連続学習",
    days: "日",
    badges: "バッジ",
    level_up: "レベルアップ！",
    badge_earned: "バッジ獲得！",
    xp_gained: "XP獲得",
    degraded: "⚠ 進捗を保存できません。このセッションの記録は終了時に失われます。",
    chapter_missing: "章が見つかりません",
    next_chapter: "次の章",
};

const EN: Texts = Texts {
    terminal_title: "Simulation Terminal",
    hint: "Hint",
    success: "✅ Correct!",
    try_again: "Almost! Check the hint",
    not_found: "Command not found",
    step: "Step",
    all_steps_done: "🎉 All command exercises completed!",
    intro: "Chapter Overview",
    why: "Why Learn This",
    goals: "Chapter Goals",
    before: "Before (The Problem)",
    after: "After (Solved with Docker)",
    local_practice: "Practice with Local Docker",
    checkpoint: "Checkpoint",
    correct: "Correct!",
    incorrect: "Incorrect",
    chapter_complete: "🏆 Chapter Complete!",
    already_complete: "You already completed this chapter",
    level: "Level",
    chapters: "Chapters",
    streak: "Learning Streak",
    days: "days",
    badges: "Badges",
    level_up: "Level Up!",
    badge_earned: "Badge Earned!",
    xp_gained: "XP Gained",
    degraded: "⚠ Progress cannot be saved. This session will be lost on exit.",
    chapter_missing: "Chapter not found",
    next_chapter: "Next chapter",
};

pub fn texts(locale: Locale) -> &'static Texts {
    match locale {
        Locale::Ja => &JA,
        Locale::En => &EN,
    }
}
