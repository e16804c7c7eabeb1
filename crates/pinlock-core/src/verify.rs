//! Pure attempt accounting for a single PIN submission.

use crate::codec::{Attempts, LockCode};

/// Outcome of comparing a submission against the stored code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub matched: bool,
    pub next: LockCode,
}

/// Compare `submitted` against `reference` and compute the successor code.
///
/// A match restores the full `max_attempts` budget; a mismatch spends one
/// attempt. The digits are never changed here. Callers persist `next` and
/// react to exhaustion; they must not call this for an absent code, since
/// without a code there is nothing to verify against.
pub fn verify(submitted: &str, reference: &LockCode, max_attempts: u32) -> Verification {
    let matched = submitted == reference.digits;
    let attempts = if matched {
        Attempts::Remaining(max_attempts)
    } else {
        reference.attempts.decremented()
    };

    Verification {
        matched,
        next: LockCode {
            digits: reference.digits.clone(),
            attempts,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DEFAULT_ATTEMPTS;

    fn reference(attempts: u32) -> LockCode {
        LockCode {
            digits: "1234".to_string(),
            attempts: Attempts::Remaining(attempts),
        }
    }

    #[test]
    fn mismatch_spends_one_attempt() {
        let result = verify("0000", &reference(3), DEFAULT_ATTEMPTS);
        assert!(!result.matched);
        assert_eq!(result.next.digits, "1234");
        assert_eq!(result.next.attempts, Attempts::Remaining(2));
    }

    #[test]
    fn match_restores_full_budget() {
        let result = verify("1234", &reference(1), DEFAULT_ATTEMPTS);
        assert!(result.matched);
        assert_eq!(result.next.digits, "1234");
        assert_eq!(result.next.attempts, Attempts::Remaining(DEFAULT_ATTEMPTS));
    }

    #[test]
    fn mismatch_at_one_reaches_exhaustion() {
        let result = verify("9999", &reference(1), DEFAULT_ATTEMPTS);
        assert!(result.next.attempts.is_exhausted());
    }

    #[test]
    fn mismatch_at_zero_stays_at_zero() {
        let result = verify("9999", &reference(0), DEFAULT_ATTEMPTS);
        assert_eq!(result.next.attempts, Attempts::Remaining(0));
    }

    #[test]
    fn configured_maximum_wins_over_default() {
        let result = verify("1234", &reference(1), 5);
        assert_eq!(result.next.attempts, Attempts::Remaining(5));
    }
}
