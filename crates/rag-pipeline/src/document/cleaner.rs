use once_cell::sync::Lazy;
use regex::Regex;

// Bare page numbers, "Page 3", "3 of 12" footer lines
static PAGE_NUMBER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:page\s+)?\d+(?:\s+of\s+\d+)?\s*$").unwrap());

// Separator/rule lines left over from footers and tables of contents
static RULE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-_=*. ]{3,}$").unwrap());

pub struct TextCleaner;

impl TextCleaner {
    /// Normalize extracted text before chunking: collapse whitespace runs,
    /// strip non-ASCII characters, drop boilerplate footer/page-number lines.
    pub fn clean(text: &str) -> String {
        text.lines()
            .map(Self::clean_line)
            .filter(|line| !line.is_empty())
            .filter(|line| !Self::is_boilerplate(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn clean_line(line: &str) -> String {
        let ascii: String = line.chars().filter(|c| c.is_ascii()).collect();

        ascii.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn is_boilerplate(line: &str) -> bool {
        PAGE_NUMBER_LINE.is_match(line) || RULE_LINE.is_match(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        let cleaned = TextCleaner::clean("hello\t\t  world   again");
        assert_eq!(cleaned, "hello world again");
    }

    #[test]
    fn strips_non_ascii() {
        let cleaned = TextCleaner::clean("caf\u{e9} r\u{e9}sum\u{e9} \u{2014} done");
        assert_eq!(cleaned, "caf rsum done");
    }

    #[test]
    fn drops_page_number_lines() {
        let text = "Real content here\n42\nPage 7\n3 of 12\nMore content";
        let cleaned = TextCleaner::clean(text);
        assert_eq!(cleaned, "Real content here\nMore content");
    }

    #[test]
    fn drops_rule_lines() {
        let text = "Intro\n----------\n==========\nBody";
        assert_eq!(TextCleaner::clean(text), "Intro\nBody");
    }

    #[test]
    fn drops_empty_lines() {
        let text = "first\n\n   \n\nsecond";
        assert_eq!(TextCleaner::clean(text), "first\nsecond");
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        assert_eq!(TextCleaner::clean("   \n\t\n  "), "");
    }

    #[test]
    fn keeps_numbered_headings() {
        // "1. Introduction" is content, not a page number
        let cleaned = TextCleaner::clean("1. Introduction");
        assert_eq!(cleaned, "1. Introduction");
    }
}
