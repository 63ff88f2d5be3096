//! Text normalization: whitespace collapsing and diacritic transliteration.
//!
//! The two transforms are independent and composable. Whitespace collapsing
//! is always applied to record text before layout; transliteration is applied
//! only when the rendering surface cannot display the native character set
//! (builtin PDF fonts are WinAnsi-encoded and have no Polish diacritics).

/// Transliteration table for the nine Polish accented letters and their
/// capitalized forms.
const POLISH_TO_ASCII: [(char, char); 18] = [
    ('ą', 'a'),
    ('ć', 'c'),
    ('ę', 'e'),
    ('ł', 'l'),
    ('ń', 'n'),
    ('ó', 'o'),
    ('ś', 's'),
    ('ź', 'z'),
    ('ż', 'z'),
    ('Ą', 'A'),
    ('Ć', 'C'),
    ('Ę', 'E'),
    ('Ł', 'L'),
    ('Ń', 'N'),
    ('Ó', 'O'),
    ('Ś', 'S'),
    ('Ź', 'Z'),
    ('Ż', 'Z'),
];

/// Replace Polish diacritics with their ASCII equivalents.
///
/// Characters outside the table pass through unchanged.
pub fn transliterate(text: &str) -> String {
    text.chars()
        .map(|c| {
            POLISH_TO_ASCII
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Collapse any run of space/tab/newline characters into a single space and
/// strip leading/trailing whitespace.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
