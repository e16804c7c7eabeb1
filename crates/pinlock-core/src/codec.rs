//! Reversible text encoding for the stored lock code.
//!
//! The settings slot holds a single opaque string; this module packs the code
//! digits and the remaining-attempts counter into it and unpacks them again.
//! Base64 keeps the value out of casual sight in settings exports. It is not
//! encryption, and the stored code must never be treated as protected.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Attempts granted after configuring a code or entering it correctly.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Remaining-attempts counter, with a sentinel for "no code configured".
///
/// `Unbounded` is the absence state: without a code there is nothing to
/// guess, so nothing ever counts toward exhaustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempts {
    Unbounded,
    Remaining(u32),
}

impl Attempts {
    /// A counter at zero is exhausted; `Unbounded` never is.
    pub fn is_exhausted(self) -> bool {
        matches!(self, Attempts::Remaining(0))
    }

    /// One failed attempt spent. Saturates at zero so an ignored exhaustion
    /// signal can never push the counter negative.
    pub fn decremented(self) -> Attempts {
        match self {
            Attempts::Unbounded => Attempts::Unbounded,
            Attempts::Remaining(n) => Attempts::Remaining(n.saturating_sub(1)),
        }
    }

    /// Concrete count, `None` for `Unbounded`.
    pub fn count(self) -> Option<u32> {
        match self {
            Attempts::Unbounded => None,
            Attempts::Remaining(n) => Some(n),
        }
    }
}

/// The decoded lock code: secret digits plus the attempts counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockCode {
    pub digits: String,
    pub attempts: Attempts,
}

impl LockCode {
    /// The absence state: no code, unlimited attempts.
    pub fn absent() -> Self {
        Self {
            digits: String::new(),
            attempts: Attempts::Unbounded,
        }
    }

    /// A code is configured iff its digits are non-empty.
    pub fn is_configured(&self) -> bool {
        !self.digits.is_empty()
    }
}

/// Pack `digits` and `attempts` into the opaque stored form.
///
/// The two fields are joined with a single space before encoding, so the
/// digits themselves must not contain one.
pub fn encode(digits: &str, attempts: u32) -> String {
    BASE64.encode(format!("{digits} {attempts}"))
}

/// Encode a freshly configured code with the full attempts budget.
pub fn encode_new(digits: &str) -> String {
    encode(digits, DEFAULT_ATTEMPTS)
}

/// Unpack a stored value into a [`LockCode`].
///
/// An empty slot decodes to [`LockCode::absent`]. So does anything malformed
/// (bad base64, non-UTF-8 payload, missing or non-numeric attempts field):
/// a value we cannot make sense of degrades to "no lock" instead of locking
/// the user out or crashing.
pub fn decode(input: &str) -> LockCode {
    if input.is_empty() {
        return LockCode::absent();
    }

    let Ok(raw) = BASE64.decode(input) else {
        return LockCode::absent();
    };
    let Ok(text) = String::from_utf8(raw) else {
        return LockCode::absent();
    };
    let Some((digits, attempts)) = text.split_once(' ') else {
        return LockCode::absent();
    };
    let Ok(attempts) = attempts.parse::<u32>() else {
        return LockCode::absent();
    };

    LockCode {
        digits: digits.to_string(),
        attempts: Attempts::Remaining(attempts),
    }
}
