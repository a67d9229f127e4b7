//! Client-side narrowing of a fetched record list.
//!
//! Every predicate looks at a different field and they combine with AND,
//! so evaluation order never changes the result. `apply_filters` checks
//! all of them in one pass per record.

use fastrace::trace;
use userdir_types::{AgeRange, FilterCriteria, Gender, ProfileRecord};

/// Returns the records matching `criteria`, in their original order.
#[trace]
pub fn apply_filters(records: &[ProfileRecord], criteria: &FilterCriteria) -> Vec<ProfileRecord> {
    let query = criteria.search_query.to_lowercase();

    records
        .iter()
        .filter(|record| {
            matches_lowercase_search(record, &query)
                && matches_age(record, criteria.age_range.as_ref())
                && matches_nationality(record, criteria.nationality.as_deref())
                && matches_gender(record, criteria.gender)
        })
        .cloned()
        .collect()
}

pub fn matches(record: &ProfileRecord, criteria: &FilterCriteria) -> bool {
    matches_search(record, &criteria.search_query)
        && matches_age(record, criteria.age_range.as_ref())
        && matches_nationality(record, criteria.nationality.as_deref())
        && matches_gender(record, criteria.gender)
}

/// Case-insensitive substring match against "first last".
pub fn matches_search(record: &ProfileRecord, query: &str) -> bool {
    matches_lowercase_search(record, &query.to_lowercase())
}

fn matches_lowercase_search(record: &ProfileRecord, query: &str) -> bool {
    query.is_empty() || record.full_name().to_lowercase().contains(query)
}

pub fn matches_age(record: &ProfileRecord, range: Option<&AgeRange>) -> bool {
    range.map_or(true, |range| range.contains(record.age()))
}

pub fn matches_nationality(record: &ProfileRecord, nationality: Option<&str>) -> bool {
    match nationality {
        Some(code) if !code.is_empty() => record.nationality_code() == code,
        _ => true,
    }
}

pub fn matches_gender(record: &ProfileRecord, gender: Option<Gender>) -> bool {
    gender.map_or(true, |gender| record.gender == gender.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdir_types::{AgeBracket, DateOfBirth, Picture, ProfileName};

    fn record(first: &str, last: &str, age: u32, nat: &str, gender: &str) -> ProfileRecord {
        ProfileRecord {
            name: ProfileName {
                first: first.to_string(),
                last: last.to_string(),
            },
            email: format!("{}.{}@example.com", first, last).to_lowercase(),
            gender: gender.to_string(),
            dob: DateOfBirth { age },
            nat: nat.to_string(),
            picture: Picture {
                thumbnail: format!("https://example.com/{}.jpg", first),
            },
        }
    }

    fn directory() -> Vec<ProfileRecord> {
        vec![
            record("Jane", "Doe", 34, "US", "female"),
            record("Lars", "Berg", 19, "NO", "male"),
            record("Ana", "Silva", 45, "BR", "female"),
            record("Tom", "Smith", 67, "GB", "male"),
            record("Mia", "Keller", 28, "US", "female"),
        ]
    }

    fn names(records: &[ProfileRecord]) -> Vec<String> {
        records.iter().map(|r| r.full_name()).collect()
    }

    #[test]
    fn test_unconstrained_returns_everything_in_order() {
        let records = directory();
        assert_eq!(apply_filters(&records, &FilterCriteria::default()), records);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = directory();
        let criteria = FilterCriteria {
            search_query: "jane".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(&records, &criteria)), vec!["Jane Doe"]);

        let criteria = FilterCriteria {
            search_query: "E D".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(&records, &criteria)), vec!["Jane Doe"]);

        let criteria = FilterCriteria {
            search_query: "er".to_string(),
            ..Default::default()
        };
        assert_eq!(
            names(&apply_filters(&records, &criteria)),
            vec!["Lars Berg", "Mia Keller"]
        );
    }

    #[test]
    fn test_age_brackets() {
        let records = directory();
        let filtered = |bracket: AgeBracket| {
            let criteria = FilterCriteria {
                age_range: Some(bracket.range()),
                ..Default::default()
            };
            names(&apply_filters(&records, &criteria))
        };

        assert_eq!(filtered(AgeBracket::UpTo20), vec!["Lars Berg"]);
        assert_eq!(filtered(AgeBracket::From21To40), vec!["Jane Doe", "Mia Keller"]);
        assert_eq!(filtered(AgeBracket::From41To60), vec!["Ana Silva"]);
        assert_eq!(filtered(AgeBracket::From61), vec!["Tom Smith"]);
    }

    #[test]
    fn test_age_range_bounds_hold_for_every_output() {
        let records = directory();
        for input in ["0-20", "20-40", "28-34", "30-", "45-45", "50-10"] {
            let range = AgeRange::parse(input).unwrap();
            let criteria = FilterCriteria {
                age_range: Some(range),
                ..Default::default()
            };
            for r in apply_filters(&records, &criteria) {
                assert!(r.age() >= range.min, "{} fails min of {}", r.full_name(), input);
                if let Some(max) = range.max {
                    assert!(r.age() <= max, "{} fails max of {}", r.full_name(), input);
                }
            }
        }
    }

    #[test]
    fn test_nationality_and_gender_are_exact() {
        let records = directory();
        let criteria = FilterCriteria {
            nationality: Some("US".to_string()),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        assert_eq!(
            names(&apply_filters(&records, &criteria)),
            vec!["Jane Doe", "Mia Keller"]
        );

        let criteria = FilterCriteria {
            nationality: Some("us".to_string()),
            ..Default::default()
        };
        assert!(apply_filters(&records, &criteria).is_empty());

        let criteria = FilterCriteria {
            nationality: Some("US".to_string()),
            gender: Some(Gender::Male),
            ..Default::default()
        };
        assert!(apply_filters(&records, &criteria).is_empty());
    }

    #[test]
    fn test_empty_nationality_is_no_constraint() {
        let records = directory();
        let criteria = FilterCriteria {
            nationality: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&records, &criteria).len(), records.len());
    }

    #[test]
    fn test_jane_scenario() {
        let records = directory();

        let criteria = FilterCriteria {
            age_range: Some(AgeBracket::UpTo20.range()),
            ..Default::default()
        };
        assert!(!names(&apply_filters(&records, &criteria)).contains(&"Jane Doe".to_string()));

        let criteria = FilterCriteria {
            search_query: "jane".to_string(),
            nationality: Some("US".to_string()),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(&records, &criteria)), vec!["Jane Doe"]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = directory();
        let criteria = FilterCriteria {
            search_query: "a".to_string(),
            age_range: AgeRange::parse("20-50"),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        let once = apply_filters(&records, &criteria);
        let twice = apply_filters(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_combined_predicate_agrees_with_apply_filters() {
        let records = directory();
        let criteria = FilterCriteria {
            search_query: "M".to_string(),
            age_range: AgeRange::parse("21-"),
            ..Default::default()
        };
        let expected: Vec<_> = records
            .iter()
            .filter(|r| matches(r, &criteria))
            .cloned()
            .collect();
        assert_eq!(apply_filters(&records, &criteria), expected);
        assert_eq!(names(&expected), vec!["Tom Smith", "Mia Keller"]);
    }

    #[test]
    fn test_parsed_records_filter_like_constructed_ones() {
        let body = r#"{"gender": "female", "name": {"first": "Jane", "last": "Doe"},
            "email": "jane@example.com", "dob": {"age": 34}, "nat": "US",
            "picture": {"thumbnail": "t.jpg"}}"#;
        let jane: ProfileRecord = serde_json::from_str(body).unwrap();
        assert!(matches_search(&jane, "JANE"));
        assert!(matches_nationality(&jane, Some("US")));
        assert!(matches_gender(&jane, Some(Gender::Female)));
        assert!(!matches_age(&jane, Some(&AgeBracket::UpTo20.range())));
    }
}
