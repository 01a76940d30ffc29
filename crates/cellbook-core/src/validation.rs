//! Data validation
//!
//! A [`ValidationRule`] describes what input a cell accepts. Rules are
//! declarative: nothing in this crate checks cell values against them,
//! the consuming spreadsheet application does.
//!
//! ## Example
//!
//! ```rust
//! use cellbook_core::{ValidationRule, ValidationType, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! let rule = ValidationRule::range(ValidationType::WholeNumber, 1.0, 10.0)
//!     .unwrap()
//!     .with_error("Out of range", "Pick a number from 1 to 10");
//! sheet.apply_validation("B2", rule).unwrap();
//!
//! assert!(sheet.get_validation_rule("B2").unwrap().is_some());
//! ```

use chrono::{NaiveDate, NaiveTime};

use crate::cell::{date_to_serial, CellAddress, CellRange};
use crate::error::{Error, Result};

/// Default title of the error alert
pub const DEFAULT_ERROR_TITLE: &str = "Invalid Input";

/// Default text of the error alert
pub const DEFAULT_ERROR_MESSAGE: &str = "The value entered is invalid.";

/// Kinds of validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationType {
    /// Value must be one of a fixed list
    List,
    /// Date between two serials
    Date,
    /// Whole number between two bounds
    WholeNumber,
    /// Decimal number between two bounds
    Decimal,
    /// Text length between two bounds
    TextLength,
    /// Value must satisfy a formula
    CustomFormula,
}

impl ValidationType {
    /// Package `type` attribute value
    pub fn xlsx_type(&self) -> &'static str {
        match self {
            ValidationType::List => "list",
            ValidationType::Date => "date",
            ValidationType::WholeNumber => "whole",
            ValidationType::Decimal => "decimal",
            ValidationType::TextLength => "textLength",
            ValidationType::CustomFormula => "custom",
        }
    }

    /// Parse a package `type` attribute value
    pub fn from_xlsx(s: &str) -> Option<Self> {
        Some(match s {
            "list" => ValidationType::List,
            "date" => ValidationType::Date,
            "whole" => ValidationType::WholeNumber,
            "decimal" => ValidationType::Decimal,
            "textLength" => ValidationType::TextLength,
            "custom" => ValidationType::CustomFormula,
            _ => return None,
        })
    }
}

/// The constraint itself
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationCriteria {
    /// One of these options
    List(Vec<String>),
    /// Between `min` and `max`, inclusive; `kind` is never `List` or
    /// `CustomFormula`
    Range {
        kind: ValidationType,
        min: f64,
        max: f64,
    },
    /// Formula text without the leading `=`
    CustomFormula(String),
}

/// A validation rule plus the alert shown when input is rejected
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationRule {
    criteria: ValidationCriteria,
    /// Error alert title
    pub error_title: String,
    /// Error alert message
    pub error_message: String,
}

impl ValidationRule {
    fn from_criteria(criteria: ValidationCriteria) -> Self {
        Self {
            criteria,
            error_title: DEFAULT_ERROR_TITLE.to_string(),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }

    /// Create a list (dropdown) rule
    ///
    /// Options are stored comma-separated, so an option containing `,`
    /// is rejected with [`Error::InvalidListOption`].
    pub fn list<I, S>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(Error::ArgumentRequired("options"));
        }
        if let Some(bad) = options.iter().find(|o| o.contains(',')) {
            return Err(Error::InvalidListOption(bad.clone()));
        }
        Ok(Self::from_criteria(ValidationCriteria::List(options)))
    }

    /// Create a bounded rule for dates, numbers or text length
    ///
    /// Fails with [`Error::UnsupportedValidationType`] for `List` and
    /// `CustomFormula`, which have their own constructors.
    pub fn range(kind: ValidationType, min: f64, max: f64) -> Result<Self> {
        match kind {
            ValidationType::Date
            | ValidationType::WholeNumber
            | ValidationType::Decimal
            | ValidationType::TextLength => Ok(Self::from_criteria(ValidationCriteria::Range {
                kind,
                min,
                max,
            })),
            ValidationType::List | ValidationType::CustomFormula => {
                Err(Error::UnsupportedValidationType(format!(
                    "{} cannot be bounded by min/max",
                    kind.xlsx_type()
                )))
            }
        }
    }

    /// Create a date rule from calendar dates
    pub fn date_between(min: NaiveDate, max: NaiveDate) -> Self {
        let serial = |d: NaiveDate| date_to_serial(d.and_time(NaiveTime::MIN));
        Self::from_criteria(ValidationCriteria::Range {
            kind: ValidationType::Date,
            min: serial(min),
            max: serial(max),
        })
    }

    /// Create a custom formula rule; a leading `=` is dropped
    pub fn custom_formula(formula: &str) -> Result<Self> {
        let formula = formula.strip_prefix('=').unwrap_or(formula);
        if formula.trim().is_empty() {
            return Err(Error::ArgumentRequired("formula"));
        }
        Ok(Self::from_criteria(ValidationCriteria::CustomFormula(
            formula.to_string(),
        )))
    }

    /// Replace the error alert
    pub fn with_error(mut self, title: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_title = title.into();
        self.error_message = message.into();
        self
    }

    /// The constraint
    pub fn criteria(&self) -> &ValidationCriteria {
        &self.criteria
    }

    /// Kind of this rule
    pub fn validation_type(&self) -> ValidationType {
        match &self.criteria {
            ValidationCriteria::List(_) => ValidationType::List,
            ValidationCriteria::Range { kind, .. } => *kind,
            ValidationCriteria::CustomFormula(_) => ValidationType::CustomFormula,
        }
    }

    /// List options, for list rules
    pub fn options(&self) -> Option<&[String]> {
        match &self.criteria {
            ValidationCriteria::List(options) => Some(options),
            _ => None,
        }
    }

    /// `(min, max)` bounds, for range rules
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self.criteria {
            ValidationCriteria::Range { min, max, .. } => Some((min, max)),
            _ => None,
        }
    }

    /// Formula text, for custom rules
    pub fn formula(&self) -> Option<&str> {
        match &self.criteria {
            ValidationCriteria::CustomFormula(f) => Some(f),
            _ => None,
        }
    }
}

/// A rule registered on a sheet together with the ranges it covers
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationEntry {
    /// Ranges this rule applies to
    pub ranges: Vec<CellRange>,
    /// The rule
    pub rule: ValidationRule,
}

impl ValidationEntry {
    /// Check whether the rule covers `addr`
    pub fn applies_to(&self, addr: &CellAddress) -> bool {
        self.ranges.iter().any(|r| r.contains(addr))
    }
}
