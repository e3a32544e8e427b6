//! Parser for the charset description grammar.
//!
//! A description is a whitespace/comma separated list of code points
//! (decimal or 0x-prefixed hex), character literals (`'c'`, with backslash
//! escapes), strings (`"abc"`), and inclusive ranges (`[A, B]` where each
//! endpoint is a code point or literal).

use std::fmt;

use super::{Charset, CharsetCollector};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A character that no grammar rule accepts at this position.
    UnexpectedCharacter { index: usize, found: char },
    /// A word that is neither a decimal nor a hex integer.
    InvalidNumber { index: usize },
    /// `'...'` or `"..."` ran into the end of input.
    UnterminatedLiteral { index: usize },
    /// A quoted character literal that does not hold exactly one character.
    InvalidCharLiteral { index: usize },
    /// Literals encountered while the identifier mode forbids them.
    LiteralNotAllowed { index: usize },
    /// Input ended inside a `[...]` range.
    UnterminatedRange,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedCharacter { index, found } => {
                write!(f, "unexpected character '{found}' at offset {index}")
            }
            ParseError::InvalidNumber { index } => {
                write!(f, "invalid number at offset {index}")
            }
            ParseError::UnterminatedLiteral { index } => {
                write!(f, "unterminated literal starting at offset {index}")
            }
            ParseError::InvalidCharLiteral { index } => {
                write!(f, "character literal at offset {index} must hold exactly one character")
            }
            ParseError::LiteralNotAllowed { index } => {
                write!(f, "character literal at offset {index} not allowed in this mode")
            }
            ParseError::UnterminatedRange => write!(f, "unterminated character range"),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between entries; any entry may start.
    Clear,
    /// Directly after an entry; a separator or whitespace must follow.
    Tight,
    /// After `[`.
    RangeBracket,
    /// After the first range endpoint.
    RangeStart,
    /// After the separator inside a range.
    RangeSeparator,
    /// After the second range endpoint; only `]` may follow.
    RangeEnd,
}

fn parse_int(word: &str, index: usize) -> Result<i64, ParseError> {
    let invalid = ParseError::InvalidNumber { index };
    let bytes = word.as_bytes();
    let mut value: i64 = 0;
    if bytes.len() > 1 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
        for &byte in &bytes[2..] {
            let digit = match byte {
                b'0'..=b'9' => byte - b'0',
                b'A'..=b'F' => byte - b'A' + 10,
                b'a'..=b'f' => byte - b'a' + 10,
                _ => return Err(invalid),
            };
            value = value.wrapping_shl(4).wrapping_add(i64::from(digit));
        }
    } else {
        for &byte in bytes {
            match byte {
                b'0'..=b'9' => {
                    value = value
                        .wrapping_mul(10)
                        .wrapping_add(i64::from(byte - b'0'));
                }
                _ => return Err(invalid),
            }
        }
    }
    Ok(value)
}

fn escaped_char(c: char) -> char {
    match c {
        '0' => '\0',
        'n' | 'N' => '\n',
        'r' | 'R' => '\r',
        's' | 'S' => ' ',
        't' | 'T' => '\t',
        other => other,
    }
}

/// Reads characters until the unescaped `terminator`, decoding backslash
/// escapes. On return the index points at the terminator.
fn read_string(
    buffer: &mut Vec<char>,
    terminator: char,
    chars: &[char],
    index: &mut usize,
) -> Result<(), ParseError> {
    let start = *index;
    *index += 1;
    let mut escape = false;
    while *index < chars.len() {
        let c = chars[*index];
        if escape {
            buffer.push(escaped_char(c));
            escape = false;
        } else if c == terminator {
            return Ok(());
        } else if c == '\\' {
            escape = true;
        } else {
            buffer.push(c);
        }
        *index += 1;
    }
    Err(ParseError::UnterminatedLiteral { index: start })
}

impl Charset {
    /// Parses a charset description, adding every mentioned code point.
    /// `disable_char_literals` rejects `'c'` and `"..."` entries, used
    /// when identifiers are raw glyph indices rather than code points.
    pub fn parse_str(
        &mut self,
        description: &str,
        disable_char_literals: bool,
        collector: Option<&CharsetCollector>,
    ) -> Result<(), ParseError> {
        let chars: Vec<char> = description.chars().collect();
        let mut state = State::Clear;
        let mut buffer: Vec<char> = Vec::new();
        let mut range_start: u32 = 0;
        let mut index = 0;

        while index < chars.len() {
            let c = chars[index];
            match c {
                '0'..='9' => {
                    if !matches!(
                        state,
                        State::Clear | State::RangeBracket | State::RangeSeparator
                    ) {
                        return Err(ParseError::UnexpectedCharacter { index, found: c });
                    }
                    let word_start = index;
                    while index < chars.len()
                        && (chars[index].is_ascii_alphanumeric() || chars[index] == '_')
                    {
                        buffer.push(chars[index]);
                        index += 1;
                    }
                    let word: String = buffer.drain(..).collect();
                    let codepoint = parse_int(&word, word_start)?;
                    match state {
                        State::Clear => {
                            if codepoint >= 0 {
                                self.add(codepoint as u32, collector);
                            }
                            state = State::Tight;
                        }
                        State::RangeBracket => {
                            range_start = codepoint as u32;
                            state = State::RangeStart;
                        }
                        State::RangeSeparator => {
                            for s in range_start..=codepoint as u32 {
                                self.add(s, collector);
                            }
                            state = State::RangeEnd;
                        }
                        _ => unreachable!(),
                    }
                    // the character after the word is already current
                    continue;
                }
                '\'' => {
                    if !matches!(
                        state,
                        State::Clear | State::RangeBracket | State::RangeSeparator
                    ) {
                        return Err(ParseError::UnexpectedCharacter { index, found: c });
                    }
                    if disable_char_literals {
                        return Err(ParseError::LiteralNotAllowed { index });
                    }
                    let literal_start = index;
                    read_string(&mut buffer, '\'', &chars, &mut index)?;
                    if buffer.len() != 1 {
                        return Err(ParseError::InvalidCharLiteral {
                            index: literal_start,
                        });
                    }
                    let codepoint = buffer[0] as u32;
                    buffer.clear();
                    match state {
                        State::Clear => {
                            if codepoint > 0 {
                                self.add(codepoint, collector);
                            }
                            state = State::Tight;
                        }
                        State::RangeBracket => {
                            range_start = codepoint;
                            state = State::RangeStart;
                        }
                        State::RangeSeparator => {
                            for s in range_start..=codepoint {
                                self.add(s, collector);
                            }
                            state = State::RangeEnd;
                        }
                        _ => unreachable!(),
                    }
                }
                '"' => {
                    if state != State::Clear {
                        return Err(ParseError::UnexpectedCharacter { index, found: c });
                    }
                    if disable_char_literals {
                        return Err(ParseError::LiteralNotAllowed { index });
                    }
                    read_string(&mut buffer, '"', &chars, &mut index)?;
                    for codepoint in buffer.drain(..) {
                        self.add(codepoint as u32, collector);
                    }
                    state = State::Tight;
                }
                '[' => {
                    if state != State::Clear {
                        return Err(ParseError::UnexpectedCharacter { index, found: c });
                    }
                    state = State::RangeBracket;
                }
                ']' => {
                    if state != State::RangeEnd {
                        return Err(ParseError::UnexpectedCharacter { index, found: c });
                    }
                    state = State::Tight;
                }
                ',' | ';' => match state {
                    State::Clear => {}
                    State::Tight => state = State::Clear,
                    State::RangeStart => state = State::RangeSeparator,
                    _ => return Err(ParseError::UnexpectedCharacter { index, found: c }),
                },
                ' ' | '\n' | '\r' | '\t' => {
                    if state == State::Tight {
                        state = State::Clear;
                    }
                }
                _ => return Err(ParseError::UnexpectedCharacter { index, found: c }),
            }
            index += 1;
        }

        if matches!(state, State::Clear | State::Tight) {
            Ok(())
        } else {
            Err(ParseError::UnterminatedRange)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FontStyle;
    use super::*;

    fn parse(description: &str) -> Result<Vec<u32>, ParseError> {
        let mut charset = Charset::new(FontStyle::Normal);
        charset.parse_str(description, false, None)?;
        Ok(charset.codepoints().to_vec())
    }

    #[test]
    fn numbers_decimal_and_hex() {
        assert_eq!(parse("65 66, 0x43").unwrap(), vec![65, 66, 0x43]);
    }

    #[test]
    fn char_literals_and_escapes() {
        assert_eq!(parse("'A'").unwrap(), vec![65]);
        assert_eq!(parse(r"'\n' '\s' '\t'").unwrap(), vec![10, 32, 9]);
        assert_eq!(parse(r"'\''").unwrap(), vec![39]);
        assert_eq!(
            parse(r"'\0'").unwrap(),
            Vec::<u32>::new(),
            "NUL literal parses but adds nothing"
        );
    }

    #[test]
    fn strings_add_each_character() {
        assert_eq!(parse("\"AB\\\"C\"").unwrap(), vec![65, 66, 34, 67]);
    }

    #[test]
    fn inclusive_range() {
        assert_eq!(parse("[65, 67]").unwrap(), vec![65, 66, 67]);
        assert_eq!(parse("['a'; 'c']").unwrap(), vec![97, 98, 99]);
        assert_eq!(
            parse("[ 0x41 , 0x42 ]").unwrap(),
            vec![0x41, 0x42],
            "whitespace inside ranges is allowed"
        );
    }

    #[test]
    fn reversed_range_is_empty() {
        assert_eq!(parse("[67, 65]").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn adjacent_entries_need_separation() {
        assert!(matches!(
            parse("65'A'"),
            Err(ParseError::UnexpectedCharacter { .. })
        ));
        assert!(parse("65 'A'").is_ok());
        assert!(parse("65, , 66").is_ok(), "extra separators are harmless");
    }

    #[test]
    fn unterminated_inputs_fail() {
        assert!(matches!(parse("[65, 66"), Err(ParseError::UnterminatedRange)));
        assert!(matches!(parse("[65"), Err(ParseError::UnterminatedRange)));
        assert!(matches!(
            parse("'A"),
            Err(ParseError::UnterminatedLiteral { .. })
        ));
        assert!(matches!(
            parse("\"abc"),
            Err(ParseError::UnterminatedLiteral { .. })
        ));
    }

    #[test]
    fn multi_char_literal_fails() {
        assert!(matches!(
            parse("'ab'"),
            Err(ParseError::InvalidCharLiteral { .. })
        ));
    }

    #[test]
    fn literals_can_be_disabled() {
        let mut charset = Charset::new(FontStyle::Normal);
        assert!(matches!(
            charset.parse_str("'A'", true, None),
            Err(ParseError::LiteralNotAllowed { .. })
        ));
        let mut indices = Charset::new(FontStyle::Normal);
        indices.parse_str("[1, 5]", true, None).unwrap();
        assert_eq!(indices.len(), 5);
    }

    #[test]
    fn collector_filters_parsed_codepoints() {
        let mut collector = CharsetCollector::new();
        let mut first = Charset::new(FontStyle::Normal);
        first.parse_str("[65, 70]", false, None).unwrap();
        collector.push(first);

        let mut second = Charset::new(FontStyle::Normal);
        second.parse_str("[60, 75]", false, Some(&collector)).unwrap();
        assert_eq!(
            second.codepoints(),
            &[60, 61, 62, 63, 64, 71, 72, 73, 74, 75],
            "claimed middle of the range must be skipped"
        );
    }

    #[test]
    fn invalid_words_fail() {
        assert!(matches!(parse("12ab"), Err(ParseError::InvalidNumber { .. })));
        assert!(matches!(parse("0xZZ"), Err(ParseError::InvalidNumber { .. })));
    }
}
