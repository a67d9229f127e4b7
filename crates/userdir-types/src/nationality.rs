/// Country codes offered by the nationality selector, with display names.
pub const NATIONALITIES: &[(&str, &str)] = &[
    ("AU", "Australia"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("IE", "Ireland"),
    ("IN", "India"),
    ("IR", "Iran"),
    ("MX", "Mexico"),
    ("NL", "Netherlands"),
    ("NO", "Norway"),
    ("NZ", "New Zealand"),
    ("RS", "Serbia"),
    ("TR", "Turkey"),
    ("UA", "Ukraine"),
    ("US", "United States"),
];

pub fn nationality_name(code: &str) -> Option<&'static str> {
    NATIONALITIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn is_known_nationality(code: &str) -> bool {
    nationality_name(code).is_some()
}
