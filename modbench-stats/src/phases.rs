//! Warmup / steady-state split
//!
//! The first iterations of a module often pay one-off costs (cold caches,
//! lazy initialisation, page faults on a fresh fixture). Reporting them
//! apart from the rest shows how much of the mean they account for.

use crate::summary::{Summary, summarize};
use serde::{Deserialize, Serialize};

/// Summaries of the leading and trailing iterations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSplit {
    /// First `k` iterations
    pub warmup: Summary,
    /// Everything after them
    pub steady: Summary,
}

/// Split `samples` after the first `warmup` iterations.
///
/// Returns `None` when `warmup` is 0. A `warmup` larger than the sample
/// count leaves the steady phase empty.
pub fn split_phases(samples: &[f64], warmup: usize) -> Option<PhaseSplit> {
    if warmup == 0 {
        return None;
    }
    let (head, tail) = samples.split_at(warmup.min(samples.len()));
    Some(PhaseSplit {
        warmup: summarize(head),
        steady: summarize(tail),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_warmup() {
        assert_eq!(split_phases(&[1.0, 2.0], 0), None);
    }

    #[test]
    fn test_split() {
        let split = split_phases(&[900.0, 100.0, 110.0, 90.0], 1).unwrap();
        assert_eq!(split.warmup.count, 1);
        assert_eq!(split.warmup.mean_ns, Some(900.0));
        assert_eq!(split.steady.count, 3);
        assert_eq!(split.steady.mean_ns, Some(100.0));
    }

    #[test]
    fn test_warmup_longer_than_run() {
        let split = split_phases(&[5.0, 6.0], 10).unwrap();
        assert_eq!(split.warmup.count, 2);
        assert!(split.steady.is_empty());
    }
}
