use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Comparison operator for condition matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Gt,
    Lt,
    Gte,
    Lte,
    /// Exact floating-point equality. Rarely matches real price data and is
    /// retained for compatibility, not recommended for production queries.
    Eq,
}

impl Operator {
    pub fn compare(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Operator::Gt => lhs > rhs,
            Operator::Lt => lhs < rhs,
            Operator::Gte => lhs >= rhs,
            Operator::Lte => lhs <= rhs,
            Operator::Eq => lhs == rhs,
        }
    }

    /// Symbol used in the human-readable condition description.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Eq => "=",
        }
    }
}

impl FromStr for Operator {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gt" => Ok(Operator::Gt),
            "lt" => Ok(Operator::Lt),
            "gte" => Ok(Operator::Gte),
            "lte" => Ok(Operator::Lte),
            "eq" => Ok(Operator::Eq),
            other => Err(AppError::InvalidQuery(format!(
                "unknown operator: {other}"
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The kind of condition a query evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    PercentageChange,
    AbsoluteThreshold,
}

impl FromStr for ConditionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage_change" => Ok(ConditionType::PercentageChange),
            "absolute_threshold" => Ok(ConditionType::AbsoluteThreshold),
            other => Err(AppError::InvalidQuery(format!(
                "unknown condition type: {other}"
            ))),
        }
    }
}

/// A pure predicate over a daily series: maps the series to the set of
/// matching dates, no mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Evaluated against each bar's day-over-day close-to-close percentage
    /// change. The first bar has no defined change and never matches.
    PercentageChange { threshold: f64, operator: Operator },
    /// Evaluated against each bar's raw close, including the first bar.
    AbsoluteThreshold { threshold: f64, operator: Operator },
}

impl Condition {
    /// Human-readable description used in query responses.
    pub fn describe(&self, ticker: &str) -> String {
        match self {
            Condition::PercentageChange {
                threshold,
                operator,
            } => format!("{ticker} changed {} {threshold}%", operator.symbol()),
            Condition::AbsoluteThreshold {
                threshold,
                operator,
            } => format!("{ticker} {} {threshold}", operator.symbol()),
        }
    }
}

/// A fixed forward look-ahead window, counted in trading-day positions
/// within the series, not calendar days.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Horizon {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "1y")]
    OneYear,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [
        Horizon::OneDay,
        Horizon::OneWeek,
        Horizon::OneMonth,
        Horizon::OneYear,
    ];

    /// Positional offset in series rows.
    pub fn offset(&self) -> usize {
        match self {
            Horizon::OneDay => 1,
            Horizon::OneWeek => 5,
            Horizon::OneMonth => 21,
            Horizon::OneYear => 252,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Horizon::OneDay => "1d",
            Horizon::OneWeek => "1w",
            Horizon::OneMonth => "1m",
            Horizon::OneYear => "1y",
        }
    }

    /// Default horizon set for queries that do not select one.
    pub fn all_vec() -> Vec<Horizon> {
        Self::ALL.to_vec()
    }
}

impl FromStr for Horizon {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Horizon::OneDay),
            "1w" => Ok(Horizon::OneWeek),
            "1m" => Ok(Horizon::OneMonth),
            "1y" => Ok(Horizon::OneYear),
            other => Err(AppError::InvalidQuery(format!(
                "unknown time horizon: {other}"
            ))),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One matching date plus its forward returns. A horizon that extends past
/// the end of the series keeps its key with an explicit null value so
/// callers can tell "no data yet" from "zero return".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInstance {
    pub date: chrono::NaiveDate,
    pub forward_returns: BTreeMap<Horizon, Option<f64>>,
}

/// Descriptive statistics for one horizon's forward returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonStats {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub win_rate: f64,
    pub count: usize,
}

impl HorizonStats {
    /// All-zero statistics emitted when no instance had a resolvable value.
    pub fn zero() -> Self {
        Self {
            mean: 0.0,
            median: 0.0,
            std: 0.0,
            min: 0.0,
            max: 0.0,
            win_rate: 0.0,
            count: 0,
        }
    }
}
