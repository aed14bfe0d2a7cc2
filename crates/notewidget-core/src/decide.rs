//! Freshness decisions

use crate::models::StreamId;

/// Whether a fetched document moves its stream forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Strictly newer than the last applied document
    Apply,
    /// Equal or older; re-delivery or an out-of-order read
    Skip,
}

impl Decision {
    pub const fn is_apply(self) -> bool {
        matches!(self, Self::Apply)
    }
}

/// `Apply` iff `fetched > stored`. Equal timestamps are a re-delivery.
pub fn decide(stream: StreamId, fetched: i64, stored: i64) -> Decision {
    let decision = if fetched > stored {
        Decision::Apply
    } else {
        Decision::Skip
    };
    tracing::debug!(%stream, fetched, stored, ?decision, "Freshness decision");
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strictly_newer_applies() {
        assert_eq!(decide(StreamId::Widget, 100, 50), Decision::Apply);
        assert_eq!(decide(StreamId::Updates, 1, 0), Decision::Apply);
    }

    #[test]
    fn equal_or_older_skips() {
        for stream in StreamId::ALL {
            assert_eq!(decide(stream, 50, 50), Decision::Skip);
            assert_eq!(decide(stream, 40, 50), Decision::Skip);
            assert_eq!(decide(stream, 0, 0), Decision::Skip);
        }
    }

    #[test]
    fn decision_is_monotonic_over_a_range() {
        let stored = 10;
        for fetched in -5..25 {
            let expected = if fetched > stored {
                Decision::Apply
            } else {
                Decision::Skip
            };
            assert_eq!(decide(StreamId::Updates, fetched, stored), expected);
        }
    }
}
