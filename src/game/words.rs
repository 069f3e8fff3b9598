// Word sources: the built-in leveled tables and player-supplied text.
use rand::Rng;
use rand::seq::SliceRandom;

use crate::GameError;

/// Built-in tables, easiest first. Index 0 holds level 1.
pub const WORDS_BY_LEVEL: [&[&str]; 5] = [
    &[
        "code", "type", "word", "key", "text", "fast", "game", "play", "star", "ship",
    ],
    &[
        "react", "space", "quick", "blast", "orbit", "comet", "laser", "speed", "alien", "pilot",
    ],
    &[
        "asteroid",
        "keyboard",
        "spaceship",
        "challenge",
        "destroy",
        "mission",
        "galaxy",
        "universe",
        "quantum",
        "velocity",
    ],
    &[
        "javascript",
        "typescript",
        "developer",
        "interstellar",
        "constellation",
        "acceleration",
        "gravitational",
        "exploration",
        "spacecraft",
        "extraterrestrial",
    ],
    &[
        "astrophysics",
        "interplanetary",
        "electromagnetic",
        "nanotechnology",
        "supernova",
        "hypervelocity",
        "antimatter",
        "singularity",
        "nebula",
        "wormhole",
    ],
];

/// Table for a 1-based word level, clamped into the available range.
pub fn table(level: u32) -> &'static [&'static str] {
    let idx = (level.max(1) as usize - 1).min(WORDS_BY_LEVEL.len() - 1);
    WORDS_BY_LEVEL[idx]
}

/// Split free text into playable words: lowercase, keep only `a-z`, split on
/// whitespace, drop anything one letter or shorter.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();
    cleaned
        .split_whitespace()
        .filter(|w| w.len() > 1)
        .map(str::to_owned)
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WordMode {
    #[default]
    Default,
    Custom,
}

impl WordMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Some(WordMode::Default),
            "custom" => Some(WordMode::Custom),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WordMode::Default => "default",
            WordMode::Custom => "custom",
        }
    }
}

/// Where spawned words come from.
#[derive(Clone, Debug, Default)]
pub struct WordBank {
    mode: WordMode,
    custom: Vec<String>,
}

impl WordBank {
    pub fn mode(&self) -> WordMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: WordMode) {
        self.mode = mode;
    }

    pub fn custom_words(&self) -> &[String] {
        &self.custom
    }

    /// Replace the custom list with the words found in `text` and switch to
    /// custom mode. Text without usable words is rejected and nothing changes.
    pub fn load_custom_text(&mut self, text: &str) -> Result<usize, GameError> {
        let words = tokenize(text);
        if words.is_empty() {
            return Err(GameError::EmptyWordList);
        }
        let count = words.len();
        self.custom = words;
        self.mode = WordMode::Custom;
        Ok(count)
    }

    /// True when spawns ignore word difficulty.
    pub fn uses_custom(&self) -> bool {
        self.mode == WordMode::Custom && !self.custom.is_empty()
    }

    /// Draw a word. `word_level` only matters for the built-in tables.
    pub fn pick<R: Rng + ?Sized>(&self, word_level: u32, rng: &mut R) -> String {
        if self.uses_custom() {
            if let Some(w) = self.custom.choose(rng) {
                return w.clone();
            }
        }
        let words = table(word_level);
        words.choose(rng).copied().unwrap_or(words[0]).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn tokenize_strips_punctuation_and_short_tokens() {
        assert_eq!(tokenize("Hello World! A"), vec!["hello", "world"]);
        assert_eq!(tokenize("  it's   O.K.\n\tgo-kart 42 "), vec!["its", "ok", "gokart"]);
        assert!(tokenize("a b c 1 2 3 !!").is_empty());
    }

    #[test]
    fn table_clamps_level() {
        assert_eq!(table(0), WORDS_BY_LEVEL[0]);
        assert_eq!(table(3), WORDS_BY_LEVEL[2]);
        assert_eq!(table(42), WORDS_BY_LEVEL[4]);
    }

    #[test]
    fn empty_custom_text_is_rejected_without_side_effects() {
        let mut bank = WordBank::default();
        bank.load_custom_text("lunar rover").unwrap();
        assert!(matches!(bank.load_custom_text("? ! x"), Err(GameError::EmptyWordList)));
        assert_eq!(bank.custom_words(), ["lunar", "rover"]);
        assert_eq!(bank.mode(), WordMode::Custom);
    }

    #[test]
    fn custom_words_replace_tables() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bank = WordBank::default();
        assert_eq!(bank.load_custom_text("Lunar rover").unwrap(), 2);
        for level in 1..=5 {
            let w = bank.pick(level, &mut rng);
            assert!(w == "lunar" || w == "rover", "unexpected {w}");
        }
        bank.set_mode(WordMode::Default);
        let w = bank.pick(1, &mut rng);
        assert!(WORDS_BY_LEVEL[0].contains(&w.as_str()));
    }

    #[test]
    fn custom_mode_without_words_falls_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bank = WordBank::default();
        bank.set_mode(WordMode::Custom);
        assert!(!bank.uses_custom());
        let w = bank.pick(2, &mut rng);
        assert!(WORDS_BY_LEVEL[1].contains(&w.as_str()));
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(WordMode::parse("Custom"), Some(WordMode::Custom));
        assert_eq!(WordMode::parse("default"), Some(WordMode::Default));
        assert_eq!(WordMode::parse("zen"), None);
        assert_eq!(WordMode::Custom.as_str(), "custom");
    }
}
