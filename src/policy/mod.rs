//! Password policy validation.
//!
//! This module provides the [`PasswordPolicyValidator`], which runs four
//! ordered gates against a candidate password. The first failing gate
//! rejects immediately; all four must pass for acceptance.
//!
//! 1. **Length** — at least 12 characters.
//! 2. **Sequential run** — no 3-character window of consecutive Unicode
//!    code points anywhere (letters, digits, and punctuation all count).
//! 3. **Character-class diversity** — at least 3 of the 4 classes
//!    {uppercase, lowercase, digit, symbol} present.
//! 4. **Dictionary** — no dictionary token appears as a substring of the
//!    password (case-sensitive).
//!
//! Any string input is well-defined; an empty password simply fails the
//! length gate. Validation never fails with an error.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::wordlist::CommonWordSet;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Minimum number of distinct character classes.
pub const MIN_CHARACTER_CLASSES: usize = 3;

/// Length of a sequential-run window.
const RUN_WINDOW: usize = 3;

/// The policy gates, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyGate {
    /// Password is shorter than [`MIN_PASSWORD_LENGTH`] characters.
    Length,
    /// Password contains a run of consecutive Unicode code points.
    SequentialRun,
    /// Fewer than [`MIN_CHARACTER_CLASSES`] character classes present.
    CharacterDiversity,
    /// A dictionary token appears inside the password.
    DictionaryWord,
}

impl std::fmt::Display for PolicyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Length => "length",
            Self::SequentialRun => "sequential-run",
            Self::CharacterDiversity => "character-diversity",
            Self::DictionaryWord => "dictionary-word",
        };
        f.write_str(name)
    }
}

/// Outcome of evaluating a password against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// All four gates passed.
    Accepted,
    /// The named gate rejected the password; later gates were not run.
    Rejected(PolicyGate),
}

impl Verdict {
    /// Returns `true` if the password was accepted.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Runs the four policy gates against candidate passwords.
///
/// The validator is stateless; the dictionary is passed by reference so
/// its lifecycle stays with the caller-owned aggregator. A completed
/// [`CommonWordSet`] is immutable, so any number of concurrent
/// validations may share it without synchronization.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordPolicyValidator;

impl PasswordPolicyValidator {
    /// Creates a validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns `true` if the password passes all four gates.
    #[must_use]
    pub fn validate(&self, password: &str, dictionary: &CommonWordSet) -> bool {
        self.evaluate(password, dictionary).is_accepted()
    }

    /// Evaluates the gates in order and reports the first failure.
    #[must_use]
    #[instrument(skip(self, password, dictionary))]
    pub fn evaluate(&self, password: &str, dictionary: &CommonWordSet) -> Verdict {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            debug!(gate = %PolicyGate::Length, "rejected");
            return Verdict::Rejected(PolicyGate::Length);
        }

        if has_sequential_run(password) {
            debug!(gate = %PolicyGate::SequentialRun, "rejected");
            return Verdict::Rejected(PolicyGate::SequentialRun);
        }

        if character_classes(password) < MIN_CHARACTER_CLASSES {
            debug!(gate = %PolicyGate::CharacterDiversity, "rejected");
            return Verdict::Rejected(PolicyGate::CharacterDiversity);
        }

        if !dictionary.common(password).is_empty() {
            debug!(gate = %PolicyGate::DictionaryWord, "rejected");
            return Verdict::Rejected(PolicyGate::DictionaryWord);
        }

        Verdict::Accepted
    }
}

/// Returns `true` if any 3-character window of the password consists of
/// consecutive Unicode code points in increasing order.
///
/// The scan deliberately visits one starting offset past the last full
/// window; the truncated final window is shorter than a full run and can
/// never match, so the extra iteration is a no-op by construction. Kept for
/// compatibility with the validator this one replaces.
fn has_sequential_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    if chars.len() < 2 {
        return false;
    }

    for start in 0..chars.len() - 1 {
        let window = &chars[start..(start + RUN_WINDOW).min(chars.len())];
        if let Some(run) = consecutive_run_from(window[0])
            && window == run.as_slice()
        {
            return true;
        }
    }

    false
}

/// The 3 consecutive code points starting at `first`, or `None` when the
/// sequence would leave the valid scalar range.
fn consecutive_run_from(first: char) -> Option<[char; RUN_WINDOW]> {
    let code_point = first as u32;
    let second = char::from_u32(code_point + 1)?;
    let third = char::from_u32(code_point + 2)?;
    Some([first, second, third])
}

/// Counts the distinct character classes present in the password.
///
/// Each character lands in exactly one of {uppercase, lowercase, digit,
/// symbol}; each class is counted once no matter how often it occurs. The
/// symbol branch sets its own flag, never another class's.
fn character_classes(password: &str) -> usize {
    let mut upper = false;
    let mut lower = false;
    let mut digit = false;
    let mut symbol = false;

    for ch in password.chars() {
        if ch.is_uppercase() {
            upper = true;
        } else if ch.is_lowercase() {
            lower = true;
        } else if ch.is_ascii_digit() {
            digit = true;
        } else {
            symbol = true;
        }
    }

    usize::from(upper) + usize::from(lower) + usize::from(digit) + usize::from(symbol)
}

/// Convenience wrapper over [`CommonWordSet::common`] for callers that want
/// the matching tokens rather than a verdict.
#[must_use]
pub fn common_tokens<'a>(password: &str, dictionary: &'a CommonWordSet) -> HashSet<&'a str> {
    dictionary.common(password)
}
