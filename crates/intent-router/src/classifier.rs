//! Ordered intent classification.

use crate::intent::Intent;
use crate::keywords::{
    default_greetings, default_interactions, Category, DEFAULT_ADD_PHRASES,
    DEFAULT_REMOVE_PHRASES, DEFAULT_TRIGGER_WORD,
};
use crate::normalize::{normalize, tokenize};
use tracing::debug;

/// Router configuration. Phrases and aliases are given in natural spelling
/// and normalized when the router is built.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Whether free text containing the trigger word reaches the AI service.
    pub ai_enabled: bool,
    pub trigger_word: String,
    pub add_phrases: Vec<String>,
    pub remove_phrases: Vec<String>,
    pub greetings: Vec<Category>,
    pub interactions: Vec<Category>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            ai_enabled: true,
            trigger_word: DEFAULT_TRIGGER_WORD.into(),
            add_phrases: DEFAULT_ADD_PHRASES.iter().map(|s| s.to_string()).collect(),
            remove_phrases: DEFAULT_REMOVE_PHRASES.iter().map(|s| s.to_string()).collect(),
            greetings: default_greetings(),
            interactions: default_interactions(),
        }
    }
}

/// Explicit commands matched against the whole trimmed, lower-cased text.
const COMMANDS: &[(&str, fn() -> Intent)] = &[
    ("!ping", || Intent::Ping),
    ("!help", || Intent::Help),
    ("!cryptonews", || Intent::CryptoNews),
];

/// Intent classifier.
///
/// Rules are evaluated in a fixed order and the first match wins:
/// explicit commands, `!<symbol>` price lookups, greetings, interactions,
/// then (when AI is enabled and the trigger word is present) admin phrases
/// before generic AI chat.
#[derive(Debug, Clone)]
pub struct Router {
    ai_enabled: bool,
    trigger_word: String,
    add_phrases: Vec<Vec<String>>,
    remove_phrases: Vec<Vec<String>>,
    greetings: Vec<(String, Vec<Vec<String>>)>,
    interactions: Vec<(String, Vec<String>)>,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            ai_enabled: config.ai_enabled,
            trigger_word: normalize(config.trigger_word.trim()),
            add_phrases: token_sequences(&config.add_phrases),
            remove_phrases: token_sequences(&config.remove_phrases),
            greetings: config
                .greetings
                .iter()
                .map(|c| (c.name.clone(), token_sequences(&c.aliases)))
                .collect(),
            interactions: config
                .interactions
                .iter()
                .map(|c| {
                    let keys = c
                        .aliases
                        .iter()
                        .map(|a| normalize(a.trim()))
                        .filter(|a| !a.is_empty())
                        .collect();
                    (c.name.clone(), keys)
                })
                .collect(),
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    /// Classify raw message text.
    pub fn classify(&self, text: &str) -> Intent {
        let original = text.trim();
        let normalized = normalize(original);
        let tokens = tokenize(&normalized);

        let intent = self.classify_parts(original, &normalized, &tokens);
        debug!("Classified as {}", intent);
        intent
    }

    /// Classify already-normalized text. `original` is carried into the
    /// admin and AI intents untouched.
    pub fn classify_parts(&self, original: &str, normalized: &str, tokens: &[String]) -> Intent {
        let lower = original.trim().to_lowercase();

        if let Some((_, make)) = COMMANDS.iter().find(|(cmd, _)| *cmd == lower) {
            return make();
        }

        if let Some(symbol) = lower.strip_prefix('!') {
            let symbol = symbol.trim();
            if symbol.is_empty() {
                return Intent::Ignored;
            }
            return Intent::CryptoPrice(symbol.to_string());
        }

        if let Some((category, _)) = self
            .greetings
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|seq| contains_sequence(tokens, seq)))
        {
            return Intent::Greeting(category.clone());
        }

        if let Some((category, _)) = self
            .interactions
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| normalized.contains(k.as_str())))
        {
            return Intent::Interaction(category.clone());
        }

        if self.ai_enabled
            && !self.trigger_word.is_empty()
            && normalized.contains(self.trigger_word.as_str())
        {
            let matches = |phrases: &[Vec<String>]| {
                phrases.iter().any(|seq| contains_sequence(tokens, seq))
            };

            // Admin phrases must never leak into the AI prompt.
            if matches(&self.add_phrases) {
                return Intent::AdminAddNumber(original.to_string());
            }
            if matches(&self.remove_phrases) {
                return Intent::AdminRemoveNumber(original.to_string());
            }
            return Intent::AiChat(original.to_string());
        }

        Intent::Ignored
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

fn token_sequences(phrases: &[String]) -> Vec<Vec<String>> {
    phrases
        .iter()
        .map(|p| tokenize(&normalize(p)))
        .filter(|seq| !seq.is_empty())
        .collect()
}

/// Whether `needle` occurs as a contiguous run inside `haystack`.
fn contains_sequence(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && haystack
            .windows(needle.len())
            .any(|window| window == needle)
}
