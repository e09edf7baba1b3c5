use chrono::NaiveDate;

use crate::core::error::{AppError, Result};

/// Constraint on the workflow state of a place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    /// `state = finish`
    Finished,
    /// `state <> finish`, including places with no state
    NotFinished,
}

/// Conjunctive predicate over places. `None` fields add no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceFilter {
    /// Substring of ticket id, comment or organization
    pub search_term: Option<String>,
    /// Substring of the category (`type`) column
    pub case_type: Option<String>,
    pub state: Option<StateFilter>,
    /// Calendar date the issue was finished
    pub finished_date: Option<NaiveDate>,
}

impl PlaceFilter {
    /// Build the search predicate from raw query parameters.
    ///
    /// The state constraint is always present: `notInvestigated=true` selects
    /// unfinished places, anything else selects finished ones.
    pub fn from_search_params(
        search_term: Option<&str>,
        case_type: Option<&str>,
        not_investigated: Option<&str>,
        finished_date: Option<&str>,
    ) -> Result<Self> {
        let not_investigated = match not_investigated.map(|v| v.trim().to_lowercase()) {
            None => false,
            Some(v) if v.is_empty() || v == "false" || v == "0" => false,
            Some(v) if v == "true" || v == "1" => true,
            Some(v) => {
                return Err(AppError::Validation(format!(
                    "Invalid notInvestigated value '{}', expected true or false",
                    v
                )))
            }
        };

        let finished_date = non_blank(finished_date)
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                    AppError::Validation(format!(
                        "Invalid finishedDate '{}', expected YYYY-MM-DD",
                        raw
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            search_term: non_blank(search_term),
            case_type: non_blank(case_type),
            state: Some(if not_investigated {
                StateFilter::NotFinished
            } else {
                StateFilter::Finished
            }),
            finished_date,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_params_selects_finished_only() {
        let filter = PlaceFilter::from_search_params(None, None, None, None).unwrap();
        assert_eq!(
            filter,
            PlaceFilter {
                state: Some(StateFilter::Finished),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_not_investigated_flag() {
        let filter = PlaceFilter::from_search_params(None, None, Some("true"), None).unwrap();
        assert_eq!(filter.state, Some(StateFilter::NotFinished));

        let filter = PlaceFilter::from_search_params(None, None, Some("false"), None).unwrap();
        assert_eq!(filter.state, Some(StateFilter::Finished));

        assert!(PlaceFilter::from_search_params(None, None, Some("maybe"), None).is_err());
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let filter =
            PlaceFilter::from_search_params(Some("  "), Some(""), Some(""), Some(" ")).unwrap();
        assert_eq!(filter.search_term, None);
        assert_eq!(filter.case_type, None);
        assert_eq!(filter.finished_date, None);
    }

    #[test]
    fn test_finished_date_parsing() {
        let filter =
            PlaceFilter::from_search_params(None, None, None, Some("2024-03-15")).unwrap();
        assert_eq!(
            filter.finished_date,
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );

        assert!(PlaceFilter::from_search_params(None, None, None, Some("15/03/2024")).is_err());
    }

    #[test]
    fn test_terms_are_trimmed() {
        let filter =
            PlaceFilter::from_search_params(Some(" 2024-ABC "), Some(" ถนน "), None, None)
                .unwrap();
        assert_eq!(filter.search_term.as_deref(), Some("2024-ABC"));
        assert_eq!(filter.case_type.as_deref(), Some("ถนน"));
    }
}
