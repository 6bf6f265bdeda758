//! Pairing table: which opener closes with which closer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// One opener/closer pair, e.g. `【` / `】`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairRule {
    pub opener: char,
    pub closer: char,
}

impl PairRule {
    pub const fn new(opener: char, closer: char) -> Self {
        Self { opener, closer }
    }

    /// Curly quotes, the pairs an input method may emit closer-first
    pub fn is_quote(&self) -> bool {
        matches!(self.opener, '\u{201C}' | '\u{2018}')
    }
}

/// Pairs enabled out of the box.
pub const DEFAULT_PAIRS: &[PairRule] = &[
    PairRule::new('【', '】'),
    PairRule::new('《', '》'),
    PairRule::new('（', '）'),
    PairRule::new('「', '」'),
    PairRule::new('『', '』'),
    PairRule::new('\u{201C}', '\u{201D}'), // “ ”
    PairRule::new('\u{2018}', '\u{2019}'), // ‘ ’
    PairRule::new('〈', '〉'),
    PairRule::new('〔', '〕'),
    PairRule::new('〖', '〗'),
    PairRule::new('｛', '｝'),
    PairRule::new('［', '］'),
];

/// Immutable opener → rule map with its closer → opener inverse.
#[derive(Debug, Clone)]
pub struct PairingTable {
    rules: Vec<PairRule>,
    by_opener: HashMap<char, PairRule>,
    by_closer: HashMap<char, char>,
}

impl PairingTable {
    /// Build a table, rejecting anything that would make lookups ambiguous.
    pub fn new(rules: impl IntoIterator<Item = PairRule>) -> Result<Self, ConfigurationError> {
        let rules: Vec<PairRule> = rules.into_iter().collect();
        let mut by_opener = HashMap::with_capacity(rules.len());
        let mut by_closer = HashMap::with_capacity(rules.len());

        for rule in &rules {
            if rule.opener == rule.closer {
                return Err(ConfigurationError::SelfPaired(rule.opener));
            }
            if by_opener.insert(rule.opener, *rule).is_some() {
                return Err(ConfigurationError::DuplicateOpener(rule.opener));
            }
            if by_closer.insert(rule.closer, rule.opener).is_some() {
                return Err(ConfigurationError::DuplicateCloser(rule.closer));
            }
        }

        if let Some(rule) = rules.iter().find(|r| by_closer.contains_key(&r.opener)) {
            return Err(ConfigurationError::OpenerIsCloser(rule.opener));
        }

        tracing::debug!("Pairing table ready ({} pairs)", rules.len());
        Ok(Self {
            rules,
            by_opener,
            by_closer,
        })
    }

    /// The built-in CJK table
    pub fn default_cjk() -> Self {
        Self::new(DEFAULT_PAIRS.iter().copied()).expect("built-in pairing table is valid")
    }

    pub fn lookup_by_opener(&self, symbol: char) -> Option<PairRule> {
        self.by_opener.get(&symbol).copied()
    }

    /// The opener that `symbol` closes, if it is a closer
    pub fn lookup_by_closer(&self, symbol: char) -> Option<char> {
        self.by_closer.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
