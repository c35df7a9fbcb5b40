use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};


/// The closed set of metrics the engine derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    #[serde(rename = "LCP")]
    Lcp,
    #[serde(rename = "CLS")]
    Cls,
    #[serde(rename = "INP")]
    Inp,
    #[serde(rename = "FCP")]
    Fcp,
    #[serde(rename = "TTFB")]
    Ttfb,
    #[serde(rename = "FID")]
    Fid,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Lcp,
        MetricKind::Cls,
        MetricKind::Inp,
        MetricKind::Fcp,
        MetricKind::Ttfb,
        MetricKind::Fid,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MetricKind::Lcp => "LCP",
            MetricKind::Cls => "CLS",
            MetricKind::Inp => "INP",
            MetricKind::Fcp => "FCP",
            MetricKind::Ttfb => "TTFB",
            MetricKind::Fid => "FID",
        }
    }

    /// Whether values are milliseconds. CLS is unitless.
    #[must_use]
    pub const fn is_timing(self) -> bool {
        !matches!(self, MetricKind::Cls)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        MetricKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(normalized))
            .ok_or(())
    }
}

/// Qualitative bucket. Ordered from best to worst.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Poor => "poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightweight copy of a raw entry kept as evidence next to a metric value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceEntry {
    pub name: Option<String>,
    pub start_time: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    #[serde(skip)]
    pub kind: MetricKind,
    pub value: f64,
    pub rating: Rating,
    pub entries: Vec<EvidenceEntry>,
}

/// Projection of a raw performance entry into evidence.
pub trait ToEvidence {
    fn to_evidence(&self) -> EvidenceEntry;
}

/// `paint` and `largest-contentful-paint` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaintEntry {
    pub name: Option<String>,
    pub start_time: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShiftSource {
    /// Node name of the shifted element, when the element is still attached.
    pub node: Option<String>,
    pub previous_rect: Option<Rect>,
    pub current_rect: Option<Rect>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutShiftEntry {
    pub name: Option<String>,
    pub start_time: f64,
    pub duration: f64,
    pub value: f64,
    pub had_recent_input: bool,
    pub sources: Vec<ShiftSource>,
}

/// `event` and `first-input` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventTimingEntry {
    pub name: Option<String>,
    pub start_time: f64,
    pub duration: f64,
    pub processing_start: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskAttribution {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LongTaskEntry {
    pub name: Option<String>,
    pub start_time: f64,
    pub duration: f64,
    pub attribution: Vec<TaskAttribution>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationEntry {
    pub name: Option<String>,
    pub start_time: f64,
    pub duration: f64,
    pub response_start: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceEntry {
    pub name: String,
    pub initiator_type: String,
    pub start_time: f64,
    pub duration: f64,
    pub transfer_size: Option<u64>,
}

impl ToEvidence for PaintEntry {
    fn to_evidence(&self) -> EvidenceEntry {
        EvidenceEntry {
            name: self.name.clone(),
            start_time: self.start_time,
            duration: self.duration,
        }
    }
}

impl ToEvidence for LayoutShiftEntry {
    fn to_evidence(&self) -> EvidenceEntry {
        EvidenceEntry {
            name: self.name.clone(),
            start_time: self.start_time,
            duration: self.duration,
        }
    }
}

impl ToEvidence for EventTimingEntry {
    fn to_evidence(&self) -> EvidenceEntry {
        EvidenceEntry {
            name: self.name.clone(),
            start_time: self.start_time,
            duration: self.duration,
        }
    }
}

impl ToEvidence for NavigationEntry {
    fn to_evidence(&self) -> EvidenceEntry {
        EvidenceEntry {
            name: self.name.clone(),
            start_time: self.start_time,
            duration: self.duration,
        }
    }
}
