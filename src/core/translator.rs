use crate::db::queries::{self, Aggregate, Scalar};
use crate::db::store::RecordStore;
use crate::errors::AppResult;
use crate::models::intent::{CASE_TYPE, DURATION, Intent};
use crate::models::measure::Measure;
use crate::models::operation::Operation;
use crate::models::window::Window;
use chrono::NaiveDate;

/// Answer given when a template matches no rows.
pub const NO_MATCHING_DATA: &str = "No matching data available.";

/// Outcome of translating one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    /// The operation has no template; the caller should ask the free-form interpreter.
    pub is_custom: bool,
}

impl Resolution {
    fn answered(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            is_custom: false,
        }
    }

    fn custom() -> Self {
        Self {
            answer: String::new(),
            is_custom: true,
        }
    }
}

/// Translates structured intents into aggregate queries against the store.
pub struct Translator<'a> {
    store: &'a RecordStore,
    today: NaiveDate,
}

impl<'a> Translator<'a> {
    /// `today` anchors `cases_date` and every duration window.
    pub fn new(store: &'a RecordStore, today: NaiveDate) -> Self {
        Self { store, today }
    }

    /// Decode the interpreter's JSON output and resolve it.
    pub fn process_query(&self, raw: &str) -> AppResult<Resolution> {
        let intent = Intent::decode(raw)?;
        self.resolve(&intent)
    }

    pub fn resolve(&self, intent: &Intent) -> AppResult<Resolution> {
        let Some(operation) = Operation::from_name(&intent.operation) else {
            return Ok(Resolution::custom());
        };

        let measure = Measure::from_case_type(intent.entity(CASE_TYPE));
        let window = if operation.uses_window() {
            Window::from_duration(intent.entity(DURATION), self.today)?
        } else {
            None
        };
        let location = intent.location();

        let answer = match operation {
            Operation::CasesDate => {
                queries::sum_on_date(self.store, measure, location, self.today)?
                    .map(|total| total.to_string())
            }
            Operation::MaxCasesDuration => {
                Some(self.scalar(Aggregate::Max, measure, location, window)?)
            }
            Operation::AverageCasesDuration => {
                Some(self.scalar(Aggregate::Avg, measure, location, window)?)
            }
            Operation::SumCasesDuration => {
                Some(self.scalar(Aggregate::Sum, measure, location, window)?)
            }
            Operation::LocationBased => queries::top_location(self.store, measure)?,
            Operation::DateBased => {
                queries::top_date(self.store, measure, location, window, intent.lower_bound())?
            }
        };

        Ok(Resolution::answered(
            answer.unwrap_or_else(|| NO_MATCHING_DATA.to_string()),
        ))
    }

    fn scalar(
        &self,
        aggregate: Aggregate,
        measure: Measure,
        location: &str,
        window: Option<Window>,
    ) -> AppResult<String> {
        let value = queries::aggregate_in_window(self.store, aggregate, measure, location, window)?;
        Ok(format_scalar(value))
    }
}

/// Integers as-is; averages with at most two decimals and no trailing zeros.
/// Rounding to two places is intentional: answers are spoken, so `5.33` rather
/// than SQLite's full `5.333333333333333`.
pub fn format_scalar(value: Scalar) -> String {
    match value {
        Scalar::Int(v) => v.to_string(),
        Scalar::Real(v) => {
            let s = format!("{:.2}", v);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}
