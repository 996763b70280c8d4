pub(crate) fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// Split a multi-valued cell such as `"CSE; ECE | IT"`.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split([';', '|', ','])
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(raw: &str) -> String {
    normalize_header(raw)
}
