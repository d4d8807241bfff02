//! Fixed analytical vocabulary shared with the upstream service.
//!
//! Network ids, alert levels, threshold statuses and the coupling-pattern
//! catalog are versioned together with the analytical service. Nothing here
//! is inferred locally; values outside the vocabulary are rejected at decode
//! time (coupling patterns excepted, which are open-ended).

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eight metabolic networks through which events are analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MetabolicNetwork {
    Carbon = 1,
    Water = 2,
    Soil = 3,
    Mineral = 4,
    Atmospheric = 5,
    Biodiversity = 6,
    Ocean = 7,
    Labor = 8,
}

impl MetabolicNetwork {
    /// All networks in id order.
    pub const ALL: [Self; 8] = [
        Self::Carbon,
        Self::Water,
        Self::Soil,
        Self::Mineral,
        Self::Atmospheric,
        Self::Biodiversity,
        Self::Ocean,
        Self::Labor,
    ];

    pub const fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|n| n.id() == id)
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Carbon => "Carbon Accumulation",
            Self::Water => "Water Appropriation",
            Self::Soil => "Soil Fertility Transfer",
            Self::Mineral => "Mineral Extraction",
            Self::Atmospheric => "Atmospheric Commons Degradation",
            Self::Biodiversity => "Biodiversity & Genetic Commons",
            Self::Ocean => "Ocean & Marine Appropriation",
            Self::Labor => "Labor & Embodied Health",
        }
    }

    /// Roman-numeral short code.
    pub const fn roman(self) -> &'static str {
        match self {
            Self::Carbon => "I",
            Self::Water => "II",
            Self::Soil => "III",
            Self::Mineral => "IV",
            Self::Atmospheric => "V",
            Self::Biodiversity => "VI",
            Self::Ocean => "VII",
            Self::Labor => "VIII",
        }
    }
}

impl TryFrom<u8> for MetabolicNetwork {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_id(value).ok_or_else(|| format!("unknown metabolic network id: {value}"))
    }
}

impl From<MetabolicNetwork> for u8 {
    fn from(network: MetabolicNetwork) -> Self {
        network.id()
    }
}

impl fmt::Display for MetabolicNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.roman(), self.label())
    }
}

/// Triage severity, strictly increasing from `Watch` to `Systemic`.
///
/// The derived `Ord` follows declaration order and is the only comparison
/// used for "at or above" checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Watch,
    Monitor,
    Alert,
    Critical,
    Systemic,
}

impl Default for AlertLevel {
    fn default() -> Self {
        Self::Watch
    }
}

impl AlertLevel {
    pub const ALL: [Self; 5] = [
        Self::Watch,
        Self::Monitor,
        Self::Alert,
        Self::Critical,
        Self::Systemic,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Watch => "WATCH",
            Self::Monitor => "MONITOR",
            Self::Alert => "ALERT",
            Self::Critical => "CRITICAL",
            Self::Systemic => "SYSTEMIC",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "WATCH" => Some(Self::Watch),
            "MONITOR" => Some(Self::Monitor),
            "ALERT" => Some(Self::Alert),
            "CRITICAL" => Some(Self::Critical),
            "SYSTEMIC" => Some(Self::Systemic),
            _ => None,
        }
    }

    /// Check whether this level is `floor` or more severe.
    pub fn is_at_least(self, floor: Self) -> bool {
        self >= floor
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream-authoritative threshold tier. Never recomputed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThresholdStatus {
    Below,
    Approaching,
    Exceeded,
}

impl ThresholdStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Below => "BELOW",
            Self::Approaching => "APPROACHING",
            Self::Exceeded => "EXCEEDED",
        }
    }
}

impl fmt::Display for ThresholdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdCategory {
    Absolute,
    RateOfChange,
    Relational,
    GovernanceDecay,
}

impl ThresholdCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::RateOfChange => "rate_of_change",
            Self::Relational => "relational",
            Self::GovernanceDecay => "governance_decay",
        }
    }
}

/// Six-layer schema applied to each network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticalLayer {
    Stock,
    Flow,
    Accumulation,
    Externality,
    Governance,
    Contestation,
}

impl AnalyticalLayer {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Flow => "flow",
            Self::Accumulation => "accumulation",
            Self::Externality => "externality",
            Self::Governance => "governance",
            Self::Contestation => "contestation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OntologyNode {
    Appropriation,
    Displacement,
    Governance,
    Resistance,
}

/// Source hierarchy, strict priority order (1 is highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SourceTier {
    FrontlineEj = 1,
    IndigenousMonitoring = 2,
    UnOperational = 3,
    SpecializedResearch = 4,
    AcademicPeerReviewed = 5,
    InvestigativeMedia = 6,
    GovernmentRegulatory = 7,
}

impl TryFrom<u8> for SourceTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::FrontlineEj),
            2 => Ok(Self::IndigenousMonitoring),
            3 => Ok(Self::UnOperational),
            4 => Ok(Self::SpecializedResearch),
            5 => Ok(Self::AcademicPeerReviewed),
            6 => Ok(Self::InvestigativeMedia),
            7 => Ok(Self::GovernmentRegulatory),
            other => Err(format!("unknown source tier: {other}")),
        }
    }
}

impl From<SourceTier> for u8 {
    fn from(tier: SourceTier) -> Self {
        tier as u8
    }
}

/// Identifier of a structural coupling pattern.
///
/// The catalog covers ids 1-11 but the upstream set is open-ended, so unknown
/// ids are carried through and given a synthesized label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouplingPatternId(pub u32);

const COUPLING_PATTERN_CATALOG: [(u32, &str); 11] = [
    (1, "Extractive Cascade"),
    (2, "Regulatory Arbitrage Loop"),
    (3, "Green Transition Paradox"),
    (4, "Atmospheric Enclosure"),
    (5, "Debt-Nature Trap"),
    (6, "Sacrifice Zone Intensification Spiral"),
    (7, "Militarized Conservation Enclosure"),
    (8, "Food Sovereignty Erosion Loop"),
    (9, "Humanitarian-Security Feedback"),
    (10, "Knowledge Enclosure Circuit"),
    (11, "Infrastructure Lock-in Ratchet"),
];

impl CouplingPatternId {
    /// Catalog label, if the id is cataloged.
    pub fn catalog_label(self) -> Option<&'static str> {
        COUPLING_PATTERN_CATALOG
            .iter()
            .find(|(id, _)| *id == self.0)
            .map(|(_, label)| *label)
    }

    /// Catalog label, or `Pattern <id>` for unknown ids.
    pub fn label(self) -> String {
        self.catalog_label()
            .map_or_else(|| format!("Pattern {}", self.0), str::to_string)
    }
}

impl fmt::Display for CouplingPatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
