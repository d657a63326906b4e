//! Person identity and field normalisation for the tracking service.
//!
//! A remote Person is keyed by a login derived only from first and last
//! name, so the same name always resolves to the same remote record.

/// Derive the remote login for a person.
///
/// Both names are lower-cased and joined with `_`; whitespace, `.` and `-`
/// are removed and anything outside ASCII is dropped (the service replaces
/// non-ASCII login characters with spaces). Returns `None` when both names
/// are empty.
///
/// `"Mary Ann"`, `"O'Neil-Smith"` → `"maryann_o'neilsmith"`
pub fn derive_login(first_name: &str, last_name: &str) -> Option<String> {
    if first_name.is_empty() && last_name.is_empty() {
        return None;
    }
    let joined = format!("{}_{}", first_name.to_lowercase(), last_name.to_lowercase());
    Some(
        joined
            .chars()
            .filter(|c| c.is_ascii() && !c.is_ascii_whitespace() && *c != '.' && *c != '-')
            .collect(),
    )
}

/// Abbreviate the states the awards office reports by code.
pub fn clean_state(state: &str) -> &str {
    match state {
        "California" => "CA",
        "New York" => "NY",
        other => other,
    }
}

/// Keep only characters representable in ISO-8859-1.
pub fn latin1_lossy(s: &str) -> String {
    s.chars().filter(|c| (*c as u32) <= 0xFF).collect()
}
