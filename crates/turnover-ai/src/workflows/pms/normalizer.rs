/// Display form of a property name: invisible-character stripping plus
/// whitespace collapsing, original casing kept.
pub(crate) fn clean_property(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Matching key for a property name. Feed exports disagree on casing
/// between rows, so grouping and chaining always go through this form.
pub(crate) fn normalize_property(value: &str) -> String {
    clean_property(value).to_ascii_lowercase()
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize_property(value)
}

#[cfg(test)]
pub(crate) fn clean_for_tests(value: &str) -> String {
    clean_property(value)
}
