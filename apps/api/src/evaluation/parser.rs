//! Model reply parsing: pull a structured block out of free text, then read the score from it.
//!
//! Both stages return tagged results. Nothing here raises: a reply that cannot be read
//! becomes `MatchScore::Defaulted`, which callers treat as a score of zero.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::evaluation::prompts::MATCH_KEY;

/// First brace-delimited span, non-greedy, spanning newlines.
static BRACE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").unwrap());

/// Outcome of the block-parsing stage.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBlock {
    Parsed(Map<String, Value>),
    Failed,
}

/// Outcome of the score-extraction stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchScore {
    Parsed(f64),
    /// The reply held no readable score. Counts as zero.
    Defaulted,
}

impl MatchScore {
    pub fn value(&self) -> f64 {
        match self {
            MatchScore::Parsed(v) => *v,
            MatchScore::Defaulted => 0.0,
        }
    }

    /// Score rounded to two decimals with a trailing `%`.
    ///
    /// Rounding works on the exact binary value with ties to even, so `12.125` becomes `12.12`.
    /// Parsed scores always keep a fractional digit (`85.0%`) and large exponents carry a
    /// sign (`1e+16%`); a defaulted score is `0%`.
    pub fn as_percentage(&self) -> String {
        match self {
            MatchScore::Parsed(v) => {
                let rounded = format!("{v:.2}").parse::<f64>().unwrap_or(*v);
                let shortest = format!("{rounded:?}");
                match shortest.split_once('e') {
                    Some((mantissa, exp)) if !exp.starts_with('-') => {
                        format!("{mantissa}e+{exp}%")
                    }
                    _ => format!("{shortest}%"),
                }
            }
            MatchScore::Defaulted => "0%".to_string(),
        }
    }
}

/// Stage one: locate the first `{...}` span and parse it, strictly first, then leniently.
pub fn parse_reply_block(text: &str) -> ReplyBlock {
    let Some(block) = BRACE_BLOCK.find(text) else {
        return ReplyBlock::Failed;
    };
    let block = block.as_str();

    let value = serde_json::from_str::<Value>(block)
        .ok()
        .or_else(|| serde_json::from_str::<Value>(&normalize_literal(block)).ok());

    match value {
        Some(Value::Object(map)) => ReplyBlock::Parsed(map),
        _ => ReplyBlock::Failed,
    }
}

/// Stage two: read the match percentage out of a model reply.
pub fn extract_match_score(text: &str) -> MatchScore {
    let ReplyBlock::Parsed(map) = parse_reply_block(text) else {
        return MatchScore::Defaulted;
    };

    let score = match map.get(MATCH_KEY) {
        Some(Value::String(raw)) => raw.replace('%', "").trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };

    match score {
        Some(v) if v.is_finite() => MatchScore::Parsed(v),
        _ => MatchScore::Defaulted,
    }
}

/// Rewrites a Python-style dict literal into JSON: single-quoted strings, `True`/`False`/`None`
/// and trailing commas. Input that is already JSON passes through unchanged.
fn normalize_literal(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut chars = block.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                out.push('"');
                while let Some(inner) = chars.next() {
                    out.push(inner);
                    match inner {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                out.push(escaped);
                            }
                        }
                        '"' => break,
                        _ => {}
                    }
                }
            }
            '\'' => {
                out.push('"');
                while let Some(inner) = chars.next() {
                    match inner {
                        '\\' => match chars.next() {
                            Some('\'') => out.push('\''),
                            Some(escaped) => {
                                out.push('\\');
                                out.push(escaped);
                            }
                            None => {}
                        },
                        '\'' => break,
                        '"' => out.push_str("\\\""),
                        other => out.push(other),
                    }
                }
                out.push('"');
            }
            ',' => {
                let mut lookahead = chars.clone();
                let next = loop {
                    match lookahead.next() {
                        Some(ws) if ws.is_whitespace() => continue,
                        other => break other,
                    }
                };
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(',');
                }
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    _ => word.as_str(),
                });
            }
            other => out.push(other),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_reply() {
        assert_eq!(
            extract_match_score(r#"{"JD Match": "85%"}"#),
            MatchScore::Parsed(85.0)
        );
    }

    #[test]
    fn test_json_wrapped_in_prose_and_fences() {
        let reply = "Here is the evaluation:\n```json\n{\n  \"JD Match\": \"72.5%\"\n}\n```\nGood luck!";
        assert_eq!(extract_match_score(reply), MatchScore::Parsed(72.5));
    }

    #[test]
    fn test_python_literal_fallback() {
        let reply = "{'JD Match': '64%', 'Shortlisted': True, 'Notes': None,}";
        let ReplyBlock::Parsed(map) = parse_reply_block(reply) else {
            panic!("literal block should parse");
        };
        assert_eq!(map["Shortlisted"], Value::Bool(true));
        assert_eq!(map["Notes"], Value::Null);
        assert_eq!(extract_match_score(reply), MatchScore::Parsed(64.0));
    }

    #[test]
    fn test_literal_with_embedded_double_quote() {
        let reply = r#"{'JD Match': '40%', 'Reason': 'Missing "Kubernetes"'}"#;
        let ReplyBlock::Parsed(map) = parse_reply_block(reply) else {
            panic!("literal block should parse");
        };
        assert_eq!(map["Reason"], Value::String("Missing \"Kubernetes\"".to_string()));
    }

    #[test]
    fn test_only_first_block_is_considered() {
        let reply = r#"{"Other": "x"} then {"JD Match": "90%"}"#;
        assert_eq!(extract_match_score(reply), MatchScore::Defaulted);
    }

    #[test]
    fn test_no_braces_fails() {
        assert_eq!(parse_reply_block("I think it is about 85%"), ReplyBlock::Failed);
        assert_eq!(
            extract_match_score("I think it is about 85%"),
            MatchScore::Defaulted
        );
    }

    #[test]
    fn test_unparseable_block_fails() {
        assert_eq!(parse_reply_block("{JD Match: eighty}"), ReplyBlock::Failed);
    }

    #[test]
    fn test_missing_key_defaults() {
        assert_eq!(
            extract_match_score(r#"{"Score": "85%"}"#),
            MatchScore::Defaulted
        );
    }

    #[test]
    fn test_non_numeric_value_defaults() {
        assert_eq!(
            extract_match_score(r#"{"JD Match": "high"}"#),
            MatchScore::Defaulted
        );
    }

    #[test]
    fn test_numeric_value_accepted() {
        assert_eq!(
            extract_match_score(r#"{"JD Match": 77}"#),
            MatchScore::Parsed(77.0)
        );
    }

    #[test]
    fn test_whitespace_around_percentage_is_tolerated() {
        assert_eq!(
            extract_match_score(r#"{"JD Match": " 58 % "}"#),
            MatchScore::Parsed(58.0)
        );
    }

    #[test]
    fn test_percentage_formatting() {
        assert_eq!(MatchScore::Parsed(85.0).as_percentage(), "85.0%");
        assert_eq!(MatchScore::Parsed(72.456).as_percentage(), "72.46%");
        assert_eq!(MatchScore::Parsed(0.0).as_percentage(), "0.0%");
        assert_eq!(MatchScore::Defaulted.as_percentage(), "0%");
    }

    #[test]
    fn test_percentage_rounds_exact_ties_to_even() {
        assert_eq!(MatchScore::Parsed(12.125).as_percentage(), "12.12%");
        assert_eq!(MatchScore::Parsed(87.125).as_percentage(), "87.12%");
        assert_eq!(MatchScore::Parsed(0.375).as_percentage(), "0.38%");
        // 2.675 is stored just below the tie, so it rounds down.
        assert_eq!(MatchScore::Parsed(2.675).as_percentage(), "2.67%");
    }

    #[test]
    fn test_percentage_large_values_use_signed_exponent() {
        assert_eq!(MatchScore::Parsed(1e16).as_percentage(), "1e+16%");
        assert_eq!(MatchScore::Parsed(2.5e20).as_percentage(), "2.5e+20%");
        assert_eq!(MatchScore::Parsed(1e15).as_percentage(), "1000000000000000.0%");
    }

    #[test]
    fn test_defaulted_value_is_zero() {
        assert_eq!(MatchScore::Defaulted.value(), 0.0);
        assert_eq!(MatchScore::Parsed(60.0).value(), 60.0);
    }

    #[test]
    fn test_normalize_literal_leaves_json_alone() {
        let json = r#"{"JD Match": "85%", "ok": true}"#;
        assert_eq!(normalize_literal(json), json);
    }
}
