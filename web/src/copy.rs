//! Placeholder text and asset paths for the card. Swap these out per recipient.

use quest_core::Stage;

pub(crate) const FUN_MESSAGES: [&str; 5] = [
    "Level up the vibe. Pick your lucky card.",
    "Party energy detected. Keep going.",
    "This birthday quest is officially chaotic.",
    "One card away from legendary luck.",
    "Confetti is waiting for the win.",
];

pub(crate) const COMPLIMENTS: [&str; 6] = [
    "You bring main-character energy to every room.",
    "Your smile could start a celebration by itself.",
    "Today looks better because you are in it.",
    "You make people feel lucky to know you.",
    "Certified icon behavior.",
    "Chaos level: fun. Vibe level: elite.",
];

pub(crate) const CHARMS: [&str; 7] = ["🍀", "🌟", "🧿", "🎲", "🦄", "💎", "🪩"];

pub(crate) const PHOTOS: [&str; 4] = [
    "/memories/photo1.jpg",
    "/memories/photo2.jpg",
    "/memories/photo3.jpg",
    "/memories/photo4.jpg",
];

pub(crate) const VIDEO: &str = "/memories/video1.mp4";

pub(crate) const NOTE: &str = "Happy birthday! Thanks for playing along.";

pub(crate) const fn stage_title(stage: Stage) -> (&'static str, &'static str) {
    match stage {
        Stage::Button => (
            "Birthday Quest",
            "Catch the button or surrender to unlock the surprise",
        ),
        Stage::Shuffle => (
            "Watch Closely",
            "Memorize where the gift appears before cards get shuffled",
        ),
        Stage::Cards => ("Pick A Card", "Only one card hides the gift"),
        Stage::Win => ("Happy Birthday", "You found the gift"),
    }
}

fn pick<'a>(table: &[&'a str], index: u8) -> &'a str {
    table[usize::from(index) % table.len()]
}

pub(crate) fn fun_message(index: u8) -> &'static str {
    pick(&FUN_MESSAGES, index)
}

pub(crate) fn compliment(index: u8) -> &'static str {
    pick(&COMPLIMENTS, index)
}

pub(crate) fn charm(index: u8) -> &'static str {
    pick(&CHARMS, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_match_default_config() {
        let config = quest_core::QuestConfig::default();
        assert_eq!(usize::from(config.fun_message_count), FUN_MESSAGES.len());
        assert_eq!(usize::from(config.compliment_count), COMPLIMENTS.len());
        assert_eq!(usize::from(config.charm_count), CHARMS.len());
    }

    #[test]
    fn lookups_wrap_instead_of_panicking() {
        assert_eq!(charm(0), "🍀");
        assert_eq!(charm(7), "🍀");
        assert_eq!(fun_message(6), FUN_MESSAGES[1]);
    }
}
