//! Severity classification.
//!
//! Maps the integer triage level captured on the intake form to the label and
//! color shown in the queue. Display only: the queue is never reordered by
//! severity.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const SEVERITY_MIN: i64 = 1;
pub const SEVERITY_MAX: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityLevel {
    /// 1: mild.
    Leve,
    /// 2: less serious.
    MenosGraves,
    /// 3: urgent.
    Urgencia,
    /// 4: very urgent.
    MuitaUrgencia,
    /// 5: emergency.
    Emergencia,
    /// Anything outside 1–5.
    Desconhecido,
}

impl SeverityLevel {
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => SeverityLevel::Leve,
            2 => SeverityLevel::MenosGraves,
            3 => SeverityLevel::Urgencia,
            4 => SeverityLevel::MuitaUrgencia,
            5 => SeverityLevel::Emergencia,
            _ => SeverityLevel::Desconhecido,
        }
    }

    pub fn level(&self) -> Option<i64> {
        match self {
            SeverityLevel::Leve => Some(1),
            SeverityLevel::MenosGraves => Some(2),
            SeverityLevel::Urgencia => Some(3),
            SeverityLevel::MuitaUrgencia => Some(4),
            SeverityLevel::Emergencia => Some(5),
            SeverityLevel::Desconhecido => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityLevel::Leve => "Leve",
            SeverityLevel::MenosGraves => "Menos Graves",
            SeverityLevel::Urgencia => "Urgência",
            SeverityLevel::MuitaUrgencia => "Muita Urgência",
            SeverityLevel::Emergencia => "Emergência",
            SeverityLevel::Desconhecido => "Desconhecido",
        }
    }

    /// Display color as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            SeverityLevel::Leve => "#0000FF",
            SeverityLevel::MenosGraves => "#008000",
            SeverityLevel::Urgencia => "#FFD700",
            SeverityLevel::MuitaUrgencia => "#FFA500",
            SeverityLevel::Emergencia => "#FF0000",
            SeverityLevel::Desconhecido => "#000",
        }
    }

    pub fn is_known(&self) -> bool {
        self.level().is_some()
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label and color pair for a severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityClass {
    pub label: &'static str,
    pub color: &'static str,
}

/// Total mapping from a severity level to its display class.
pub fn classify(level: i64) -> SeverityClass {
    let severity = SeverityLevel::from_level(level);
    SeverityClass {
        label: severity.label(),
        color: severity.color(),
    }
}
