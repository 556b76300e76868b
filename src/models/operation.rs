use serde::Serialize;

/// The aggregate templates the translator knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operation {
    CasesDate,
    MaxCasesDuration,
    AverageCasesDuration,
    SumCasesDuration,
    LocationBased,
    DateBased,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CasesDate => "cases_date",
            Operation::MaxCasesDuration => "max_cases_duration",
            Operation::AverageCasesDuration => "average_cases_duration",
            Operation::SumCasesDuration => "sum_cases_duration",
            Operation::LocationBased => "location_based",
            Operation::DateBased => "date_based",
        }
    }

    /// `None` means the operation has no template (custom fallback).
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "cases_date" => Some(Operation::CasesDate),
            "max_cases_duration" => Some(Operation::MaxCasesDuration),
            "average_cases_duration" => Some(Operation::AverageCasesDuration),
            "sum_cases_duration" => Some(Operation::SumCasesDuration),
            "location_based" => Some(Operation::LocationBased),
            "date_based" => Some(Operation::DateBased),
            _ => None,
        }
    }

    /// Whether the template honours the `duration` entity.
    pub fn uses_window(&self) -> bool {
        matches!(
            self,
            Operation::MaxCasesDuration
                | Operation::AverageCasesDuration
                | Operation::SumCasesDuration
                | Operation::DateBased
        )
    }
}
