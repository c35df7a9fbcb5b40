use super::types::{MetricKind, Rating};

/// Upper bounds for the `good` and `needs-improvement` buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPair {
    pub good_max: f64,
    pub poor_max: f64,
}

impl ThresholdPair {
    /// Pair used for metrics without a published threshold: everything rates `good`.
    pub const UNRATED: ThresholdPair = ThresholdPair {
        good_max: f64::INFINITY,
        poor_max: f64::INFINITY,
    };

    #[must_use]
    pub fn classify(self, value: f64) -> Rating {
        if value <= self.good_max {
            Rating::Good
        } else if value <= self.poor_max {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

/// Core Web Vitals thresholds. Timing metrics are in milliseconds.
#[must_use]
pub const fn thresholds(kind: MetricKind) -> ThresholdPair {
    match kind {
        MetricKind::Lcp => ThresholdPair {
            good_max: 2500.0,
            poor_max: 4000.0,
        },
        MetricKind::Cls => ThresholdPair {
            good_max: 0.1,
            poor_max: 0.25,
        },
        MetricKind::Inp => ThresholdPair {
            good_max: 200.0,
            poor_max: 500.0,
        },
        MetricKind::Fcp => ThresholdPair {
            good_max: 1800.0,
            poor_max: 3000.0,
        },
        MetricKind::Ttfb => ThresholdPair {
            good_max: 800.0,
            poor_max: 1800.0,
        },
        MetricKind::Fid => ThresholdPair {
            good_max: 100.0,
            poor_max: 300.0,
        },
    }
}

#[must_use]
pub fn classify(kind: MetricKind, value: f64) -> Rating {
    thresholds(kind).classify(value)
}

/// Rates a value for a metric given by name. Names outside the known set are
/// never an error; they rate as [`Rating::Good`].
#[must_use]
pub fn classify_named(name: &str, value: f64) -> Rating {
    name.parse::<MetricKind>()
        .map_or(ThresholdPair::UNRATED, thresholds)
        .classify(value)
}
