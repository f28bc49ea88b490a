use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn honorifics() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:mrs|mr|ms|broker|agent)\b\.?").expect("honorific pattern is valid")
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Clean raw broker names: strip titles, collapse whitespace, capitalize
/// each word, drop empties and duplicates. First-seen order is kept.
pub fn normalize_broker_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();

    for name in names {
        let stripped = honorifics().replace_all(name.as_ref(), " ");
        let normalized = stripped
            .split_whitespace()
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ");

        if !normalized.is_empty() && seen.insert(normalized.clone()) {
            cleaned.push(normalized);
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_titles_and_capitalizes() {
        let names = ["mr. john   SMITH", "Broker Jane Doe", "  agent bob lee  "];
        assert_eq!(
            normalize_broker_names(&names),
            vec!["John Smith", "Jane Doe", "Bob Lee"]
        );
    }

    #[test]
    fn test_dedupes_in_first_seen_order() {
        let names = ["Jane Doe", "Ms. jane doe", "Alan Roe", "JANE DOE"];
        assert_eq!(normalize_broker_names(&names), vec!["Jane Doe", "Alan Roe"]);
    }

    #[test]
    fn test_titles_only_are_dropped() {
        let names = ["Mr.", "  ", "Agent", "Mrs"];
        assert!(normalize_broker_names(&names).is_empty());
    }

    #[test]
    fn test_title_inside_word_is_kept() {
        let names = ["Mrsa Agentson", "Brokerage Smith"];
        assert_eq!(
            normalize_broker_names(&names),
            vec!["Mrsa Agentson", "Brokerage Smith"]
        );
    }
}
