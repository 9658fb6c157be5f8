use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("slug pattern is valid"));

/// URL slug for a title: lowercased, each space becomes a hyphen, anything else that is not a word
/// character or hyphen is dropped.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase().replace(' ', "-");
    NON_SLUG_CHARS.replace_all(&lowered, "").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Comma,
    Line,
}

/// Splits a list field typed as text. Segments are trimmed and empty ones dropped.
pub fn split_list(text: &str, separator: Separator) -> Vec<String> {
    let segments: Box<dyn Iterator<Item = &str>> = match separator {
        Separator::Comma => Box::new(text.split(',')),
        Separator::Line => Box::new(text.lines()),
    };
    segments
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Adds `value` when absent, removes it when present. Returns whether it is now a member.
pub fn toggle_membership(members: &mut Vec<String>, value: &str) -> bool {
    if let Some(pos) = members.iter().position(|m| m == value) {
        members.remove(pos);
        false
    } else {
        members.push(value.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("My Cool Project!"), "my-cool-project");
        assert_eq!(slugify("Next.js & Rust: 2024"), "nextjs--rust-2024");
        assert_eq!(slugify("already-slugged_title"), "already-slugged_title");
    }

    #[test]
    fn slugify_is_deterministic() {
        assert_eq!(slugify("Portfolio Site"), slugify("Portfolio Site"));
        assert_eq!(slugify("Café Menu"), "caf-menu");
    }

    #[test]
    fn split_list_trims_and_drops_empty_segments() {
        assert_eq!(split_list(" react, ,rust ,", Separator::Comma), vec!["react", "rust"]);
        assert_eq!(
            split_list("Auth\n\n  Payments \r\nSearch", Separator::Line),
            vec!["Auth", "Payments", "Search"]
        );
        assert!(split_list("   ", Separator::Comma).is_empty());
    }

    #[test]
    fn toggle_membership_adds_then_removes() {
        let mut techs = vec!["rust".to_string()];
        assert!(toggle_membership(&mut techs, "react"));
        assert_eq!(techs, vec!["rust", "react"]);
        assert!(!toggle_membership(&mut techs, "rust"));
        assert_eq!(techs, vec!["react"]);
    }
}
