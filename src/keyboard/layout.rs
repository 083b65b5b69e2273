use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyboardError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Urdu,
}

impl Language {
    pub const ALL: &'static [Language] = &[Language::English, Language::Urdu];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Urdu => "urdu",
        }
    }

    pub fn is_supported(code: &str) -> bool {
        code.parse::<Language>().is_ok()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = KeyboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "english" => Ok(Language::English),
            "urdu" => Ok(Language::Urdu),
            other => Err(KeyboardError::UnsupportedLanguage(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Lowercase,
    Uppercase,
    Symbols,
}

impl Mode {
    pub const ALL: &'static [Mode] = &[Mode::Lowercase, Mode::Uppercase, Mode::Symbols];

    pub fn code(self) -> &'static str {
        match self {
            Mode::Lowercase => "lowercase",
            Mode::Uppercase => "uppercase",
            Mode::Symbols => "symbols",
        }
    }

    /// Lowercase and uppercase carry letter case; symbols does not.
    pub fn is_letter_case(self) -> bool {
        !matches!(self, Mode::Symbols)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Mode {
    type Err = KeyboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowercase" => Ok(Mode::Lowercase),
            "uppercase" => Ok(Mode::Uppercase),
            "symbols" => Ok(Mode::Symbols),
            other => Err(KeyboardError::UnsupportedMode(other.to_string())),
        }
    }
}

type Rows = &'static [&'static [&'static str]];

/// A grid of key glyphs, row-major. Cells are whole glyphs and may span
/// more than one code point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Layout {
    rows: Rows,
}

impl Layout {
    pub const fn new(rows: Rows) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &'static [&'static [&'static str]] {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count of every row, top to bottom.
    pub fn shape(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row.len()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cells(&self) -> impl Iterator<Item = &'static str> + 'static {
        let rows = self.rows;
        rows.iter().flat_map(|row| row.iter().copied())
    }

    pub fn flatten(&self) -> Vec<&'static str> {
        self.cells().collect()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&'static str> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn character_at(&self, flat_index: usize) -> Option<&'static str> {
        self.cells().nth(flat_index)
    }

    /// First row-major match.
    pub fn position_of(&self, glyph: &str) -> Option<(usize, usize)> {
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                if *cell == glyph {
                    return Some((row_idx, col_idx));
                }
            }
        }
        None
    }
}

const ENGLISH_LOWERCASE: Rows = &[
    &["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"],
    &["a", "s", "d", "f", "g", "h", "j", "k", "l"],
    &["z", "x", "c", "v", "b", "n", "m"],
];

const ENGLISH_UPPERCASE: Rows = &[
    &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P"],
    &["A", "S", "D", "F", "G", "H", "J", "K", "L"],
    &["Z", "X", "C", "V", "B", "N", "M"],
];

const URDU_LOWERCASE: Rows = &[
    &["ض", "ص", "ث", "ق", "ف", "غ", "ع", "ه", "خ", "ح"],
    &["ش", "س", "ی", "ب", "ل", "ا", "ت", "ن", "م", "ک"],
    &["ئ", "ء", "ؤ", "ر", "لا", "ۓ", "و", "ز", "ظ", "ط"],
    &["ژ", "ج", "چ", "د", "ڈ", "ذ", "ڑ", "گ"],
];

// Urdu has no letter case; the only difference is the final heh on row 1.
const URDU_UPPERCASE: Rows = &[
    &["ض", "ص", "ث", "ق", "ف", "غ", "ع", "ہ", "خ", "ح"],
    &["ش", "س", "ی", "ب", "ل", "ا", "ت", "ن", "م", "ک"],
    &["ئ", "ء", "ؤ", "ر", "لا", "ۓ", "و", "ز", "ظ", "ط"],
    &["ژ", "ج", "چ", "د", "ڈ", "ذ", "ڑ", "گ"],
];

const SYMBOLS: Rows = &[
    &["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"],
    &["!", "@", "#", "$", "%", "^", "&", "*", "(", ")"],
    &["-", "_", "=", "+", "[", "]", "{", "}", "|", "\\"],
    &[";", ":", "\"", "'", "<", ">", ",", ".", "?", "/"],
    &["~", "`", "€", "¥", "£", "¢", "±", "×", "÷", "§"],
];

/// The built-in layouts. Symbols is shared by every language.
pub struct LayoutTable;

impl LayoutTable {
    pub const DEFAULT_LANGUAGE: Language = Language::English;
    pub const DEFAULT_MODE: Mode = Mode::Lowercase;

    pub fn layout(language: Language, mode: Mode) -> Layout {
        let rows = match (language, mode) {
            (_, Mode::Symbols) => SYMBOLS,
            (Language::English, Mode::Lowercase) => ENGLISH_LOWERCASE,
            (Language::English, Mode::Uppercase) => ENGLISH_UPPERCASE,
            (Language::Urdu, Mode::Lowercase) => URDU_LOWERCASE,
            (Language::Urdu, Mode::Uppercase) => URDU_UPPERCASE,
        };
        Layout::new(rows)
    }

    /// Resolve a layout from raw codes. Unknown codes fall back to the
    /// default (english, lowercase) entry instead of failing.
    pub fn layout_by_code(language: &str, mode: &str) -> Layout {
        match (language.parse::<Language>(), mode.parse::<Mode>()) {
            (Ok(language), Ok(mode)) => Self::layout(language, mode),
            (parsed_language, parsed_mode) => {
                tracing::warn!(
                    language,
                    mode,
                    language_ok = parsed_language.is_ok(),
                    mode_ok = parsed_mode.is_ok(),
                    "unknown layout requested, using default"
                );
                Self::layout(Self::DEFAULT_LANGUAGE, Self::DEFAULT_MODE)
            }
        }
    }

    pub fn languages() -> &'static [Language] {
        Language::ALL
    }

    pub fn modes() -> &'static [Mode] {
        Mode::ALL
    }

    pub fn flatten(language: Language, mode: Mode) -> Vec<&'static str> {
        Self::layout(language, mode).flatten()
    }
}
