/// Marker word that introduces the ingredients line in the panel text.
const INGREDIENTS_MARKER: &str = "רכיבים";

/// Lines longer than this are assumed to be running copy, not the
/// ingredients line itself.
const INGREDIENTS_MAX_CHARS: usize = 200;

/// Scan the panel's visible text line by line and pull out the ingredients
/// line, if any. First line containing the marker word and under the length
/// ceiling wins; the marker and surrounding punctuation are stripped.
pub fn find_ingredients_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| {
            line.contains(INGREDIENTS_MARKER) && line.chars().count() < INGREDIENTS_MAX_CHARS
        })
        .map(strip_ingredients_marker)
}

fn strip_ingredients_marker(line: &str) -> String {
    line.replacen(INGREDIENTS_MARKER, "", 1)
        .trim()
        .trim_start_matches(':')
        .trim()
        .to_string()
}

/// First `max_chars` characters of the panel text. Character-based, never
/// byte-based: the text is Hebrew and a byte slice could split a code point.
pub fn preview_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_and_strips_ingredients_line() {
        let text = "חלב טרי 3%\nרכיבים: חלב פרה, ויטמין D\nערכים תזונתיים";
        assert_eq!(
            find_ingredients_line(text),
            Some("חלב פרה, ויטמין D".to_string())
        );
    }

    #[test]
    fn skips_overlong_marker_lines() {
        let long_line = format!("{} {}", INGREDIENTS_MARKER, "א".repeat(250));
        let text = format!("{}\nרכיבים: מים", long_line);
        assert_eq!(find_ingredients_line(&text), Some("מים".to_string()));
    }

    #[test]
    fn returns_none_without_marker() {
        assert_eq!(find_ingredients_line("חלב טרי\nמחיר 6.90"), None);
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let text = "ח".repeat(400);
        let preview = preview_text(&text, 300);
        assert_eq!(preview.chars().count(), 300);
    }

    #[test]
    fn preview_keeps_short_text_whole() {
        assert_eq!(preview_text("חלב", 300), "חלב");
    }
}
