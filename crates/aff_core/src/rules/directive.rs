//! Tokenizing and classifying rule file lines.

use super::Direction;
use crate::flags::Flag;

/// Whitespace-separated tokens of a line, or `None` for blank and comment
/// lines.
pub fn tokenize(line: &str) -> Option<Vec<&str>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.first() {
        None => None,
        Some(first) if first.starts_with('#') => None,
        Some(_) => Some(tokens),
    }
}

/// Header of a `PFX`/`SFX` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixHeader {
    pub direction: Direction,
    pub flag: Flag,
    pub cross_product: bool,
    /// The raw count field when it does not parse
    pub count: Result<usize, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    Flag(Option<&'a str>),
    Set(Option<&'a str>),
    Try,
    NeedAffix(Option<&'a str>),
    Affix(AffixHeader),
    /// `PFX`/`SFX` with too few fields to be a header
    ShortHeader(Direction, Option<&'a str>),
    Unknown(&'a str),
}

impl<'a> Directive<'a> {
    /// Classify a tokenized line. `tokens` must be non-empty.
    pub fn parse(tokens: &[&'a str]) -> Self {
        let arg = tokens.get(1).copied();
        match tokens[0] {
            "FLAG" => Directive::Flag(arg),
            "SET" => Directive::Set(arg),
            "TRY" => Directive::Try,
            "NEEDAFFIX" => Directive::NeedAffix(arg),
            keyword => match Direction::from_keyword(keyword) {
                Some(direction) if tokens.len() >= 4 => Directive::Affix(AffixHeader {
                    direction,
                    flag: Flag::from(tokens[1]),
                    cross_product: tokens[2] == "Y",
                    count: tokens[3].parse().map_err(|_| tokens[3].to_string()),
                }),
                Some(direction) => Directive::ShortHeader(direction, arg),
                None => Directive::Unknown(keyword),
            },
        }
    }
}

/// The fields of one affix entry: `<flag> <strip> <append>[/<flags>] [<condition> [<morph>...]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixLine<'a> {
    pub flag: &'a str,
    pub strip: &'a str,
    pub append: &'a str,
    pub continuation: Option<&'a str>,
    /// `None` for an absent or `.` condition
    pub condition: Option<&'a str>,
    pub morph: &'a [&'a str],
}

impl<'a> AffixLine<'a> {
    /// Parse the fields after any leading `PFX`/`SFX` keyword.
    pub fn parse(fields: &'a [&'a str]) -> Option<Self> {
        if fields.len() < 3 {
            return None;
        }
        let (append, continuation) = match fields[2].split_once('/') {
            Some((text, flags)) if !flags.is_empty() => (text, Some(flags)),
            Some((text, _)) => (text, None),
            None => (fields[2], None),
        };
        let condition = fields.get(3).copied().filter(|c| *c != ".");
        Some(Self {
            flag: fields[0],
            strip: empty_if_zero(fields[1]),
            append: empty_if_zero(append),
            continuation,
            condition,
            morph: fields.get(4..).unwrap_or(&[]),
        })
    }
}

fn empty_if_zero(field: &str) -> &str {
    if field == "0" {
        ""
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blank_lines() {
        assert_eq!(tokenize(""), None);
        assert_eq!(tokenize("   \t "), None);
        assert_eq!(tokenize("# SFX A Y 1"), None);
        assert_eq!(tokenize("SFX A Y 1"), Some(vec!["SFX", "A", "Y", "1"]));
    }

    #[test]
    fn test_affix_header() {
        let tokens = tokenize("PFX U N 2").unwrap();
        match Directive::parse(&tokens) {
            Directive::Affix(h) => {
                assert_eq!(h.direction, Direction::Prefix);
                assert_eq!(h.flag.as_str(), "U");
                assert!(!h.cross_product);
                assert_eq!(h.count, Ok(2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_affix_header_with_bad_count() {
        let tokens = tokenize("SFX A Y many").unwrap();
        match Directive::parse(&tokens) {
            Directive::Affix(h) => assert_eq!(h.count, Err("many".to_string())),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_directives_are_case_sensitive() {
        let tokens = tokenize("sfx A Y 1").unwrap();
        assert_eq!(Directive::parse(&tokens), Directive::Unknown("sfx"));
        let tokens = tokenize("REP 2").unwrap();
        assert_eq!(Directive::parse(&tokens), Directive::Unknown("REP"));
    }

    #[test]
    fn test_simple_directives() {
        assert_eq!(Directive::parse(&["FLAG", "long"]), Directive::Flag(Some("long")));
        assert_eq!(Directive::parse(&["SET"]), Directive::Set(None));
        assert_eq!(Directive::parse(&["TRY", "abc"]), Directive::Try);
        assert_eq!(Directive::parse(&["NEEDAFFIX", "X"]), Directive::NeedAffix(Some("X")));
        assert_eq!(
            Directive::parse(&["SFX", "A"]),
            Directive::ShortHeader(Direction::Suffix, Some("A"))
        );
    }

    #[test]
    fn test_affix_line_zero_fields() {
        let fields = ["A", "0", "s", "."];
        let line = AffixLine::parse(&fields).unwrap();
        assert_eq!(line.strip, "");
        assert_eq!(line.append, "s");
        assert_eq!(line.condition, None);
        assert!(line.morph.is_empty());

        let fields = ["A", "y", "0"];
        let line = AffixLine::parse(&fields).unwrap();
        assert_eq!(line.strip, "y");
        assert_eq!(line.append, "");
        assert_eq!(line.condition, None);
    }

    #[test]
    fn test_affix_line_continuation_and_morph() {
        let fields = ["A", "0", "ed/B", "[^e]", "is:past", "po:verb"];
        let line = AffixLine::parse(&fields).unwrap();
        assert_eq!(line.append, "ed");
        assert_eq!(line.continuation, Some("B"));
        assert_eq!(line.condition, Some("[^e]"));
        assert_eq!(line.morph, &["is:past", "po:verb"]);

        let fields = ["A", "0", "0/B", "."];
        let line = AffixLine::parse(&fields).unwrap();
        assert_eq!(line.append, "");
        assert_eq!(line.continuation, Some("B"));
    }

    #[test]
    fn test_affix_line_too_short() {
        assert_eq!(AffixLine::parse(&["A", "0"]), None);
    }
}
