//! Legacy trigger source: physical key + shift state → pair.
//!
//! Some hosts cannot observe the committed symbol when the key goes down (an
//! input method reports the key as "Process"), only which physical key was
//! pressed. For those, the engine can arm a pair from the key chord instead.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::error::ConfigurationError;
use super::table::{PairRule, PairingTable};

/// Physical keys that produce CJK punctuation on a pinyin layout.
///
/// Names follow the DOM `KeyboardEvent.code` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Comma,
    Period,
    BracketLeft,
    BracketRight,
    Digit9,
    Digit0,
    Quote,
    Backslash,
    Backquote,
    Minus,
    Equal,
    Semicolon,
    Slash,
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyCode::Comma => "Comma",
            KeyCode::Period => "Period",
            KeyCode::BracketLeft => "BracketLeft",
            KeyCode::BracketRight => "BracketRight",
            KeyCode::Digit9 => "Digit9",
            KeyCode::Digit0 => "Digit0",
            KeyCode::Quote => "Quote",
            KeyCode::Backslash => "Backslash",
            KeyCode::Backquote => "Backquote",
            KeyCode::Minus => "Minus",
            KeyCode::Equal => "Equal",
            KeyCode::Semicolon => "Semicolon",
            KeyCode::Slash => "Slash",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for KeyCode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comma" | "," => Ok(KeyCode::Comma),
            "period" | "." => Ok(KeyCode::Period),
            "bracketleft" | "[" => Ok(KeyCode::BracketLeft),
            "bracketright" | "]" => Ok(KeyCode::BracketRight),
            "digit9" | "9" => Ok(KeyCode::Digit9),
            "digit0" | "0" => Ok(KeyCode::Digit0),
            "quote" | "'" => Ok(KeyCode::Quote),
            "backslash" | "\\" => Ok(KeyCode::Backslash),
            "backquote" | "`" => Ok(KeyCode::Backquote),
            "minus" | "-" => Ok(KeyCode::Minus),
            "equal" | "=" => Ok(KeyCode::Equal),
            "semicolon" | ";" => Ok(KeyCode::Semicolon),
            "slash" | "/" => Ok(KeyCode::Slash),
            _ => Err(ConfigurationError::InvalidKey(format!("Unknown key: {}", s))),
        }
    }
}

/// A physical key together with the shift state it was pressed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub shift: bool,
}

impl KeyChord {
    pub const fn new(code: KeyCode, shift: bool) -> Self {
        Self { code, shift }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, false)
    }

    pub const fn shifted(code: KeyCode) -> Self {
        Self::new(code, true)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shift {
            write!(f, "Shift+{}", self.code)
        } else {
            write!(f, "{}", self.code)
        }
    }
}

/// Parse a chord string like "shift+comma" or "BracketLeft"
impl FromStr for KeyChord {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut shift = false;
        let mut code = None;

        for part in s.split('+') {
            if part.trim().eq_ignore_ascii_case("shift") {
                shift = true;
                continue;
            }
            if code.is_some() {
                return Err(ConfigurationError::InvalidKey(format!(
                    "Multiple keys in chord: {}",
                    s
                )));
            }
            code = Some(part.parse::<KeyCode>()?);
        }

        let code = code
            .ok_or_else(|| ConfigurationError::InvalidKey(format!("No key found in chord: {}", s)))?;
        Ok(KeyChord::new(code, shift))
    }
}

/// Chord → opener assignments shipped by default (Microsoft/Sogou pinyin layout).
pub const DEFAULT_KEY_BINDINGS: &[(KeyChord, char)] = &[
    (KeyChord::shifted(KeyCode::Comma), '《'),
    (KeyChord::plain(KeyCode::BracketLeft), '【'),
    (KeyChord::shifted(KeyCode::BracketLeft), '「'),
    (KeyChord::shifted(KeyCode::Digit9), '（'),
    (KeyChord::shifted(KeyCode::Quote), '\u{201C}'),
    (KeyChord::plain(KeyCode::Quote), '\u{2018}'),
];

/// Typed chord → pair lookup, validated against a [`PairingTable`].
#[derive(Debug, Clone, Default)]
pub struct KeycodeTable {
    by_chord: HashMap<KeyChord, PairRule>,
}

impl KeycodeTable {
    /// Build a table from explicit bindings. Every chord must be unique and
    /// every opener must exist in `pairs`.
    pub fn new(
        bindings: impl IntoIterator<Item = (KeyChord, char)>,
        pairs: &PairingTable,
    ) -> Result<Self, ConfigurationError> {
        let mut by_chord = HashMap::new();
        for (chord, opener) in bindings {
            let rule = pairs
                .lookup_by_opener(opener)
                .ok_or(ConfigurationError::UnknownOpener(opener))?;
            if by_chord.insert(chord, rule).is_some() {
                return Err(ConfigurationError::DuplicateChord(chord.to_string()));
            }
        }
        Ok(Self { by_chord })
    }

    /// The default layout, restricted to openers present in `pairs`
    pub fn default_pinyin(pairs: &PairingTable) -> Self {
        let by_chord = DEFAULT_KEY_BINDINGS
            .iter()
            .filter_map(|&(chord, opener)| Some((chord, pairs.lookup_by_opener(opener)?)))
            .collect();
        Self { by_chord }
    }

    pub fn lookup(&self, chord: KeyChord) -> Option<PairRule> {
        self.by_chord.get(&chord).copied()
    }

    pub fn len(&self) -> usize {
        self.by_chord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chord.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_codes() {
        assert_eq!("Comma".parse::<KeyCode>(), Ok(KeyCode::Comma));
        assert_eq!("bracketleft".parse::<KeyCode>(), Ok(KeyCode::BracketLeft));
        assert_eq!("[".parse::<KeyCode>(), Ok(KeyCode::BracketLeft));
        assert!("KeyA".parse::<KeyCode>().is_err());
    }

    #[test]
    fn test_parse_chords() {
        assert_eq!(
            "shift+comma".parse::<KeyChord>(),
            Ok(KeyChord::shifted(KeyCode::Comma))
        );
        assert_eq!(
            "Digit9+Shift".parse::<KeyChord>(),
            Ok(KeyChord::shifted(KeyCode::Digit9))
        );
        assert_eq!(
            "Quote".parse::<KeyChord>(),
            Ok(KeyChord::plain(KeyCode::Quote))
        );
        assert!("shift".parse::<KeyChord>().is_err());
        assert!("comma+period".parse::<KeyChord>().is_err());
    }

    #[test]
    fn test_chord_display_round_trips() {
        let chord = KeyChord::shifted(KeyCode::BracketLeft);
        assert_eq!(chord.to_string(), "Shift+BracketLeft");
        assert_eq!(chord.to_string().parse::<KeyChord>(), Ok(chord));
    }

    #[test]
    fn test_default_bindings_resolve() {
        let pairs = PairingTable::default_cjk();
        let keys = KeycodeTable::default_pinyin(&pairs);
        assert_eq!(keys.len(), DEFAULT_KEY_BINDINGS.len());
        assert_eq!(
            keys.lookup(KeyChord::shifted(KeyCode::Comma)),
            Some(PairRule::new('《', '》'))
        );
        assert_eq!(keys.lookup(KeyChord::plain(KeyCode::Comma)), None);
    }

    #[test]
    fn test_shift_state_distinguishes_chords() {
        let keys = KeycodeTable::default_pinyin(&PairingTable::default_cjk());
        let plain = keys.lookup(KeyChord::plain(KeyCode::BracketLeft)).unwrap();
        let shifted = keys.lookup(KeyChord::shifted(KeyCode::BracketLeft)).unwrap();
        assert_eq!(plain.opener, '【');
        assert_eq!(shifted.opener, '「');
    }

    #[test]
    fn test_default_layout_skips_missing_openers() {
        let pairs = PairingTable::new([PairRule::new('【', '】')]).unwrap();
        let keys = KeycodeTable::default_pinyin(&pairs);
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_duplicate_chord_rejected() {
        let pairs = PairingTable::default_cjk();
        let chord = KeyChord::plain(KeyCode::BracketLeft);
        let err = KeycodeTable::new([(chord, '【'), (chord, '〖')], &pairs).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateChord("BracketLeft".to_string()));
    }

    #[test]
    fn test_unknown_opener_rejected() {
        let pairs = PairingTable::default_cjk();
        let err = KeycodeTable::new([(KeyChord::plain(KeyCode::Slash), '】')], &pairs)
            .unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownOpener('】'));
    }
}
