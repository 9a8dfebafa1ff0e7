//! Regular expression matching on string columns.

use super::locations::BadLocations;
use crate::core::{Check, Table};
use crate::prelude::*;
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Regex compilation flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegexFlags {
    pub ignore_case: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
}

fn default_case() -> bool {
    true
}

/// Fails unless every value of the governed string columns fully matches
/// `pattern`.
///
/// Missing values are replaced by `na` before matching; without `na` a
/// missing value never matches. Governed columns must hold strings.
///
/// ```rust
/// use bulwark::checks::MatchesRegex;
/// use bulwark::core::Check;
///
/// let check = MatchesRegex::new(r"[A-Z]{2}\d+").columns(["code"]).case(false);
/// assert_eq!(check.name(), "matches_regex");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchesRegex {
    pub pattern: String,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default = "default_case")]
    pub case: bool,
    #[serde(default)]
    pub flags: RegexFlags,
    #[serde(default)]
    pub na: Option<String>,
}

impl MatchesRegex {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            columns: None,
            case: true,
            flags: RegexFlags::default(),
            na: None,
        }
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Case-sensitive matching when true (the default).
    pub fn case(mut self, case: bool) -> Self {
        self.case = case;
        self
    }

    pub fn flags(mut self, flags: RegexFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Substitute for missing values.
    pub fn na(mut self, na: impl Into<String>) -> Self {
        self.na = Some(na.into());
        self
    }

    fn compile(&self) -> Result<Regex> {
        Ok(RegexBuilder::new(&format!(r"\A(?:{})\z", self.pattern))
            .case_insensitive(!self.case || self.flags.ignore_case)
            .multi_line(self.flags.multi_line)
            .dot_matches_new_line(self.flags.dot_matches_new_line)
            .ignore_whitespace(self.flags.ignore_whitespace)
            .build()?)
    }
}

fn is_string_like(data_type: &DataType) -> bool {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => true,
        DataType::Dictionary(_, value) => is_string_like(value),
        _ => false,
    }
}

impl Check for MatchesRegex {
    fn name(&self) -> &str {
        "matches_regex"
    }

    #[instrument(skip(self, table), fields(pattern = %self.pattern))]
    fn validate(&self, table: &Table) -> Result<()> {
        let regex = self.compile()?;
        let columns = table.resolve_columns(self.columns.as_deref())?;

        let mut bad = BadLocations::new();
        for column in &columns {
            let array = table.column(column)?;
            if !is_string_like(array.data_type()) {
                return Err(BulwarkError::TypeMismatch {
                    column: column.clone(),
                    expected: "string".to_string(),
                    found: array.data_type().to_string(),
                });
            }
            let strings = cast(array, &DataType::Utf8)?;
            let strings = strings.as_string::<i32>();
            for row in 0..strings.len() {
                let value = if strings.is_null(row) {
                    self.na.as_deref()
                } else {
                    Some(strings.value(row))
                };
                if !value.is_some_and(|v| regex.is_match(v)) {
                    bad.push(table, row, column);
                }
            }
        }

        if bad.is_empty() {
            Ok(())
        } else {
            Err(BulwarkError::violation(
                self.name(),
                bad.describe(&format!("values not matching '{}'", self.pattern)),
            ))
        }
    }
}

/// Fails unless every value of the governed string columns fully matches
/// `pattern`.
///
/// `case`, `flags` and `na` behave as on [`MatchesRegex`].
pub fn matches_regex<'a>(
    table: &'a Table,
    pattern: &str,
    columns: Option<&[&str]>,
    case: bool,
    flags: RegexFlags,
    na: Option<&str>,
) -> Result<&'a Table> {
    let mut check = MatchesRegex::new(pattern).case(case).flags(flags);
    if let Some(columns) = columns {
        check = check.columns(columns.iter().copied());
    }
    if let Some(na) = na {
        check = check.na(na);
    }
    check.check(table)
}
