use serde_json::{json, Value};
use userdir_types::*;
use userdir_view::{DirectoryView, ViewPhase};

pub const LOADING_MESSAGE: &str = "Loading users...";
pub const ERROR_MESSAGE: &str = "Error fetching data";
pub const NO_MATCHES_MESSAGE: &str = "Oops, no users match the selected criteria.";
pub const EMPTY_DIRECTORY_MESSAGE: &str = "No users available.";

pub fn format_record(record: &ProfileRecord) -> String {
    let nationality = match nationality_name(record.nationality_code()) {
        Some(name) => format!("{} ({})", record.nationality_code(), name),
        None => record.nationality_code().to_string(),
    };

    [
        record.full_name(),
        format!("  {}", record.email),
        format!("  Gender: {}", record.gender),
        format!("  Age: {}", record.age()),
        format!("  Nationality: {}", nationality),
        format!("  Thumbnail: {}", record.thumbnail_url()),
    ]
    .join("\n")
}

pub fn format_records(records: &[ProfileRecord]) -> String {
    records
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders one of the three view states. `no_matches` distinguishes an
/// over-filtered list from a source that returned nothing.
pub fn format_phase(phase: &ViewPhase, no_matches: bool) -> String {
    match phase {
        ViewPhase::Loading => LOADING_MESSAGE.to_string(),
        ViewPhase::Errored(_) => ERROR_MESSAGE.to_string(),
        ViewPhase::Ready(records) if records.is_empty() => {
            if no_matches {
                NO_MATCHES_MESSAGE.to_string()
            } else {
                EMPTY_DIRECTORY_MESSAGE.to_string()
            }
        }
        ViewPhase::Ready(records) => format_records(records),
    }
}

pub fn format_criteria(criteria: &FilterCriteria) -> String {
    let mut parts = Vec::new();
    if !criteria.search_query.is_empty() {
        parts.push(format!("search \"{}\"", criteria.search_query));
    }
    if let Some(range) = &criteria.age_range {
        parts.push(format!("age {}", range));
    }
    if let Some(code) = criteria.nationality.as_deref().filter(|c| !c.is_empty()) {
        parts.push(format!("nationality {}", code));
    }
    if let Some(gender) = criteria.gender {
        parts.push(format!("gender {}", gender));
    }

    if parts.is_empty() {
        "Filters: none".to_string()
    } else {
        format!("Filters: {}", parts.join(", "))
    }
}

pub fn format_view(view: &DirectoryView) -> String {
    let phase = view.phase();
    let body = format_phase(&phase, view.no_matches());

    match &phase {
        ViewPhase::Ready(records) => format!(
            "{}\n\n{}\n\n{} of {} users",
            format_criteria(&view.criteria()),
            body,
            records.len(),
            view.total_records()
        ),
        _ => body,
    }
}

pub fn view_to_json(view: &DirectoryView) -> Value {
    let criteria = view.criteria();
    match view.phase() {
        ViewPhase::Loading => json!({
            "phase": "loading",
            "criteria": criteria,
        }),
        ViewPhase::Errored(err) => json!({
            "phase": "errored",
            "error": err.to_string(),
            "criteria": criteria,
        }),
        ViewPhase::Ready(records) => json!({
            "phase": "ready",
            "criteria": criteria,
            "total": view.total_records(),
            "no_matches": view.no_matches(),
            "records": records,
        }),
    }
}

pub fn format_nationalities() -> String {
    NATIONALITIES
        .iter()
        .map(|(code, name)| format!("{}  {}", code, name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_age_brackets() -> String {
    AgeBracket::ALL
        .iter()
        .map(|b| b.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_function_stats(stats: &[FunctionStats]) -> Vec<String> {
    let width = stats.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut lines = vec![format!(
        "  {:<width$}  {:>5}  {:>10}  {:>10}  {:>10}",
        "function",
        "calls",
        "total",
        "avg",
        "max",
        width = width
    )];
    for s in stats {
        lines.push(format!(
            "  {:<width$}  {:>5}  {:>10}  {:>10}  {:>10}",
            s.name,
            s.calls,
            format_micros(s.total_us),
            format_micros(s.avg_us),
            format_micros(s.max_us),
            width = width
        ));
    }
    lines
}

fn format_micros(us: u64) -> String {
    if us < 1000 {
        format!("{}us", us)
    } else {
        format!("{:.2}ms", us as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdir_source::FetchError;

    fn jane() -> ProfileRecord {
        serde_json::from_str(
            r#"{"gender": "female", "name": {"first": "Jane", "last": "Doe"},
                "email": "jane@example.com", "dob": {"age": 34}, "nat": "US",
                "picture": {"thumbnail": "https://example.com/jane.jpg"}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_format_record() {
        assert_eq!(
            format_record(&jane()),
            "Jane Doe\n  jane@example.com\n  Gender: female\n  Age: 34\n  \
             Nationality: US (United States)\n  Thumbnail: https://example.com/jane.jpg"
        );
    }

    #[test]
    fn test_phases_render_distinctly() {
        assert_eq!(format_phase(&ViewPhase::Loading, false), LOADING_MESSAGE);
        assert_eq!(
            format_phase(
                &ViewPhase::Errored(FetchError::NetworkFailure("HTTP 500".into())),
                false
            ),
            ERROR_MESSAGE
        );
        assert_eq!(format_phase(&ViewPhase::Ready(vec![]), true), NO_MATCHES_MESSAGE);
        assert_eq!(
            format_phase(&ViewPhase::Ready(vec![]), false),
            EMPTY_DIRECTORY_MESSAGE
        );
        assert!(format_phase(&ViewPhase::Ready(vec![jane()]), false).starts_with("Jane Doe"));
    }

    #[test]
    fn test_format_criteria() {
        assert_eq!(format_criteria(&FilterCriteria::default()), "Filters: none");

        let criteria = FilterCriteria {
            search_query: "jane".to_string(),
            age_range: Some(AgeBracket::From61.range()),
            nationality: Some("US".to_string()),
            gender: Some(Gender::Female),
        };
        assert_eq!(
            format_criteria(&criteria),
            "Filters: search \"jane\", age 61+, nationality US, gender female"
        );
    }

    #[test]
    fn test_nationality_table_lists_every_code() {
        let table = format_nationalities();
        assert_eq!(table.lines().count(), NATIONALITIES.len());
        assert!(table.contains("GB  United Kingdom"));
        assert_eq!(format_age_brackets(), "0-20, 21-40, 41-60, 61+");
    }
}
