use crate::foundation::core::BBox;
use crate::layer::model::LayerId;

/// Severity of a single issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Advisory.
    Warn,
    /// Blocking.
    Fail,
}

/// Aggregate verdict for a creative, ordered `Pass < Warn < Fail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// No issues.
    Pass,
    /// Only advisory issues.
    Warn,
    /// At least one blocking issue.
    Fail,
}

impl Status {
    /// Worst severity wins; an empty list passes.
    pub fn aggregate(issues: &[Issue]) -> Self {
        issues
            .iter()
            .map(|i| match i.severity {
                Severity::Warn => Status::Warn,
                Severity::Fail => Status::Fail,
            })
            .max()
            .unwrap_or(Status::Pass)
    }

    /// Badge text.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Warn => "WARN",
            Status::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule that produced an issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// A layer's bounds leave the safe zone.
    OutsideSafeZone,
    /// Text below the minimum font size.
    MinFont,
    /// Alcohol creative without a disclaimer layer.
    MissingDisclaimer,
}

impl IssueCode {
    /// Severity attached to every issue with this code.
    pub fn severity(self) -> Severity {
        match self {
            IssueCode::OutsideSafeZone | IssueCode::MissingDisclaimer => Severity::Fail,
            IssueCode::MinFont => Severity::Warn,
        }
    }
}

/// One rule violation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Violated rule.
    pub code: IssueCode,
    /// Human-readable explanation.
    pub message: String,
    /// WARN or FAIL.
    pub severity: Severity,
    /// Offending layer, absent for creative-wide issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<LayerId>,
}

impl Issue {
    pub(crate) fn new(code: IssueCode, message: impl Into<String>, layer_id: Option<LayerId>) -> Self {
        Self {
            code,
            message: message.into(),
            severity: code.severity(),
            layer_id,
        }
    }
}

/// Evaluation output: verdict, the safe zone used, and every issue in emission order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    /// Aggregate of `issues`.
    pub status: Status,
    /// Safe zone of the evaluated format.
    pub safe_rect: BBox,
    /// Issues in layer order, creative-wide issues last.
    pub issues: Vec<Issue>,
}

impl ComplianceResult {
    /// Codes in emission order.
    pub fn codes(&self) -> Vec<IssueCode> {
        self.issues.iter().map(|i| i.code).collect()
    }

    /// Issues attached to `id`.
    pub fn issues_for<'a>(&'a self, id: &'a LayerId) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues
            .iter()
            .filter(move |i| i.layer_id.as_ref() == Some(id))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compliance/issue.rs"]
mod tests;
