use crate::error::SyntaxError;
use crate::token::{Token, TokenKind};

fn txt(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

fn one(b: u8) -> Vec<u8> {
    vec![b]
}

/// Tokenises a pattern. Operates on raw bytes — this dialect only supports
/// 8-bit characters (see crate-level Non-goals), so byte offsets double as
/// character offsets throughout.
pub fn lex(pattern: &str) -> Result<Vec<Token>, SyntaxError> {
    let bytes = pattern.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'{' => {
                let (tok, len) = lex_quantifier(bytes, i)?;
                push_token(&mut tokens, tok)?;
                i += len;
            }
            b'(' => {
                let (text, len) = if bytes[i..].starts_with(b"(?:") { ("(?:", 3) } else { ("(", 1) };
                push_token(&mut tokens, Token::new(TokenKind::StartGroup, i, text, txt(text)))?;
                i += len;
            }
            b')' => {
                push_token(&mut tokens, Token::new(TokenKind::EndGroup, i, ")", txt(")")))?;
                i += 1;
            }
            b'^' => {
                push_token(&mut tokens, Token::new(TokenKind::Caret, i, "^", txt("^")))?;
                i += 1;
            }
            b'$' => {
                push_token(&mut tokens, Token::new(TokenKind::Dollar, i, "$", txt("$")))?;
                i += 1;
            }
            b'|' => {
                if i == 0 || i == bytes.len() - 1 || bytes[i + 1] == b'|' {
                    return Err(SyntaxError::new("Invalid location for OR token", i));
                }
                push_token(&mut tokens, Token::new(TokenKind::OrOp, i, "|", txt("|")))?;
                i += 1;
            }
            b'.' => {
                push_token(&mut tokens, Token::new(TokenKind::Dot, i, ".", txt(".")))?;
                i += 1;
            }
            b'[' => {
                let (mut class_tokens, len) = lex_char_class(bytes, i)?;
                for t in class_tokens.drain(..) {
                    push_token(&mut tokens, t)?;
                }
                i += len;
            }
            b'+' | b'*' | b'?' => {
                let lazy = i + 1 < bytes.len() && bytes[i + 1] == b'?';
                let (kind, text) = match (c, lazy) {
                    (b'+', false) => (TokenKind::GreedyPlus, "+"),
                    (b'+', true) => (TokenKind::LazyPlus, "+?"),
                    (b'*', false) => (TokenKind::GreedyStar, "*"),
                    (b'*', true) => (TokenKind::LazyStar, "*?"),
                    (b'?', false) => (TokenKind::GreedyQMark, "?"),
                    (b'?', true) => (TokenKind::LazyQMark, "??"),
                    _ => unreachable!(),
                };
                push_token(&mut tokens, Token::new(kind, i, text, txt(text)))?;
                i += if lazy { 2 } else { 1 };
            }
            b'\\' => {
                let tok = read_escape(bytes, i + 1)?;
                i += tok.original_text.len();
                push_token(&mut tokens, tok)?;
            }
            _ => {
                let s = (c as char).to_string();
                push_token(&mut tokens, Token::new(TokenKind::Literal, i, s, one(c)))?;
                i += 1;
            }
        }
    }

    Ok(tokens)
}

fn push_token(tokens: &mut Vec<Token>, tok: Token) -> Result<(), SyntaxError> {
    // A quantifier needs something to quantify: it's an error both right
    // after another quantifier and at the very start of the pattern.
    if tok.kind.is_quantifier() && tokens.last().map(|t| t.kind.is_quantifier()).unwrap_or(true) {
        return Err(SyntaxError::new("Invalid quantifier", tok.position + 1));
    }
    tokens.push(tok);
    Ok(())
}

/// `open_brace` is the index of `{`. Returns the token (a quantifier, or a
/// literal `{` if the braces don't form a well-formed quantifier) and the
/// number of bytes consumed starting at `open_brace`.
fn lex_quantifier(bytes: &[u8], open_brace: usize) -> Result<(Token, usize), SyntaxError> {
    let start = open_brace + 1;
    let mut i = start;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }

    if i > start {
        let n_end = i;
        let mut kind = TokenKind::StaticQuan;
        let mut m_start = 0;
        let mut m_end = 0;

        if i < bytes.len() && bytes[i] == b',' {
            kind = TokenKind::GreedyMinQuan;
            i += 1;
            m_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            m_end = i;
            if m_end > m_start {
                kind = TokenKind::GreedyRangeQuan;
            }
        }

        if i < bytes.len() && bytes[i] == b'}' {
            let close = i;
            i += 1; // past '}'

            let n_str = std::str::from_utf8(&bytes[start..n_end]).unwrap();
            let mut original_text = format!("{{{}}}", std::str::from_utf8(&bytes[start..close]).unwrap());
            let value = match kind {
                TokenKind::GreedyRangeQuan => {
                    let m_str = std::str::from_utf8(&bytes[m_start..m_end]).unwrap();
                    format!("{},{}", n_str, m_str)
                }
                _ => n_str.to_string(),
            };

            if kind != TokenKind::StaticQuan && i < bytes.len() && bytes[i] == b'?' {
                original_text.push('?');
                i += 1;
                kind = if kind == TokenKind::GreedyMinQuan { TokenKind::LazyMinQuan } else { TokenKind::LazyRangeQuan };
            }

            let tok = Token::new(kind, open_brace, original_text, txt(&value));
            return Ok((tok, i - open_brace));
        }
    }

    // Not a well-formed quantifier: the '{' is a literal.
    Ok((Token::new(TokenKind::Literal, open_brace, "{", txt("{")), 1))
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

/// Reads one escape sequence. `start` is the index of the character right
/// after the backslash. The returned token's `original_text` includes the
/// backslash, so its length is the total number of bytes consumed by the
/// whole escape (backslash included).
fn read_escape(bytes: &[u8], start: usize) -> Result<Token, SyntaxError> {
    if start >= bytes.len() {
        return Err(SyntaxError::new("Incomplete escape sequence", start));
    }

    let c = bytes[start];
    let simple = |value: u8| -> Token { Token::new(TokenKind::Literal, start, format!("\\{}", c as char), one(value)) };

    match c {
        b'r' => Ok(simple(b'\r')),
        b'n' => Ok(simple(b'\n')),
        b't' => Ok(simple(b'\t')),
        b'f' => Ok(simple(0x0c)),
        b'x' => {
            if start + 2 >= bytes.len() {
                return Err(SyntaxError::new("Invalid escape sequence. Expected a 2 digit hex value", start));
            }
            let hi = hex_digit(bytes[start + 1]);
            let lo = hex_digit(bytes[start + 2]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => {
                    let value = hi * 16 + lo;
                    let original_text = format!("\\x{}{}", bytes[start + 1] as char, bytes[start + 2] as char);
                    Ok(Token::new(TokenKind::Literal, start, original_text, one(value)))
                }
                _ => Err(SyntaxError::new("Invalid escape sequence. Expected a 2 digit hex value", start)),
            }
        }
        // Legacy "\u" decodes 1-4 *decimal* digits into a byte value 0-255.
        // This is not Unicode despite the name; preserved as-is.
        b'u' => {
            let mut j = start + 1;
            let digits_start = j;
            while j < bytes.len() && j < start + 5 && bytes[j].is_ascii_digit() {
                j += 1;
            }
            let digits = &bytes[digits_start..j];
            if digits.is_empty() {
                return Err(SyntaxError::new("Invalid escape sequence. Expected a 1-4 digit decimal character value", start));
            }
            let num_str = std::str::from_utf8(digits).unwrap();
            let value: u32 = num_str.parse().unwrap_or(u32::MAX);
            if value > 255 {
                return Err(SyntaxError::new("Invalid character code. Value must be between 0 and 255", start));
            }
            let original_text = format!("\\u{}", num_str);
            Ok(Token::new(TokenKind::Literal, start, original_text, one(value as u8)))
        }
        b'd' | b'D' | b'w' | b'W' | b's' | b'S' | b'b' | b'B' => {
            let text = format!("\\{}", c as char);
            Ok(Token::new(TokenKind::Special, start, text.clone(), txt(&text)))
        }
        other => Ok(simple(other)),
    }
}

/// `open_bracket` is the index of `[`. Returns the tokens for the class
/// (START_CHAR_CLASS, literal/range members, END_CHAR_CLASS) and the number
/// of bytes consumed starting at `open_bracket`.
fn lex_char_class(bytes: &[u8], open_bracket: usize) -> Result<(Vec<Token>, usize), SyntaxError> {
    let mut tokens = Vec::new();
    let content_start = open_bracket + 1;
    let mut i = content_start;
    let mut negated = false;

    if i < bytes.len() && bytes[i] == b'^' {
        negated = true;
        i += 1;
    }

    let open_text = if negated { "[^" } else { "[" };
    tokens.push(Token::new(TokenKind::StartCharClass, open_bracket, open_text, txt(open_text)));

    if i < bytes.len() && bytes[i] == b'-' {
        tokens.push(Token::new(TokenKind::Literal, i, "-", txt("-")));
        i += 1;
    }

    loop {
        if i >= bytes.len() {
            return Err(SyntaxError::new("Character class ended unexpectedly", i));
        }

        let c = bytes[i];

        if c == b']' {
            if i == content_start {
                return Err(SyntaxError::new("Invalid character class", i));
            }
            tokens.push(Token::new(TokenKind::EndCharClass, i, "]", txt("]")));
            return Ok((tokens, i - open_bracket + 1));
        }

        let mut tok = if c == b'\\' {
            let t = read_escape(bytes, i + 1)?;
            i += t.original_text.len();
            t
        } else {
            let t = Token::new(TokenKind::Literal, i, (c as char).to_string(), one(c));
            i += 1;
            t
        };

        // Range detection: `tok` holds the lower bound we just read.
        if i + 1 < bytes.len() && bytes[i] == b'-' && bytes[i + 1] != b']' {
            if tok.kind == TokenKind::Special {
                return Err(SyntaxError::new(
                    format!("Invalid character range. The special sequence '{}' cannot be used in a character range", tok.original_text),
                    tok.position,
                ));
            }
            let min_range = tok.value[0];
            i += 1; // skip '-'

            let max_range = if bytes[i] == b'\\' {
                let t = read_escape(bytes, i + 1)?;
                if t.kind == TokenKind::Special {
                    return Err(SyntaxError::new(
                        format!("Invalid character range. The special sequence '{}' cannot be used in a character range", t.original_text),
                        t.position,
                    ));
                }
                i += t.original_text.len();
                t.value[0]
            } else {
                let m = bytes[i];
                i += 1;
                m
            };

            if min_range >= max_range {
                return Err(SyntaxError::new("Invalid character range. Minimum value must be less than the maximum value", content_start));
            }

            let original_text = format!("{}-{}", min_range as char, max_range as char);
            tok = Token::new(TokenKind::CharRange, tok.position, original_text, vec![min_range, max_range]);
        }

        tokens.push(tok);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(pattern: &str) -> Vec<TokenKind> {
        lex(pattern).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_literals_and_dot() {
        assert_eq!(kinds("a.b"), vec![TokenKind::Literal, TokenKind::Dot, TokenKind::Literal]);
    }

    #[test]
    fn lexes_quantifiers() {
        assert_eq!(kinds("a+b*c?"), vec![
            TokenKind::Literal, TokenKind::GreedyPlus,
            TokenKind::Literal, TokenKind::GreedyStar,
            TokenKind::Literal, TokenKind::GreedyQMark,
        ]);
        assert_eq!(kinds("a+?"), vec![TokenKind::Literal, TokenKind::LazyPlus]);
    }

    #[test]
    fn lexes_braced_quantifiers() {
        assert_eq!(kinds("a{3}"), vec![TokenKind::Literal, TokenKind::StaticQuan]);
        assert_eq!(kinds("a{2,}"), vec![TokenKind::Literal, TokenKind::GreedyMinQuan]);
        assert_eq!(kinds("a{2,4}"), vec![TokenKind::Literal, TokenKind::GreedyRangeQuan]);
        assert_eq!(kinds("a{2,4}?"), vec![TokenKind::Literal, TokenKind::LazyRangeQuan]);
    }

    #[test]
    fn malformed_brace_is_literal() {
        assert_eq!(kinds("a{bc"), vec![TokenKind::Literal, TokenKind::Literal, TokenKind::Literal, TokenKind::Literal]);
    }

    #[test]
    fn adjacent_quantifiers_error() {
        assert!(lex("a++").is_err());
        assert!(lex("*abc").is_err());
    }

    #[test]
    fn lexes_char_class_range() {
        let toks = lex("[a-z]").unwrap();
        assert_eq!(toks[0].kind, TokenKind::StartCharClass);
        assert_eq!(toks[1].kind, TokenKind::CharRange);
        assert_eq!(toks[1].value, vec![b'a', b'z']);
        assert_eq!(toks[2].kind, TokenKind::EndCharClass);
    }

    #[test]
    fn negated_char_class() {
        let toks = lex("[^abc]").unwrap();
        assert_eq!(toks[0].original_text, "[^");
    }

    #[test]
    fn empty_char_class_is_error() {
        assert!(lex("[]").is_err());
    }

    #[test]
    fn unbalanced_char_class_is_error() {
        assert!(lex("[abc").is_err());
    }

    #[test]
    fn special_cannot_be_range_endpoint() {
        assert!(lex(r"[\d-z]").is_err());
    }

    #[test]
    fn escapes() {
        let toks = lex(r"\n\t\x41\u065").unwrap();
        assert_eq!(toks[0].value, vec![b'\n']);
        assert_eq!(toks[1].value, vec![b'\t']);
        assert_eq!(toks[2].value, vec![0x41]);
        assert_eq!(toks[3].value, vec![65]);
    }

    #[test]
    fn unicode_escape_out_of_range_errors() {
        assert!(lex(r"\u999").is_err());
    }

    #[test]
    fn special_meta_escapes() {
        let toks = lex(r"\d\w\s\b").unwrap();
        assert!(toks.iter().all(|t| t.kind == TokenKind::Special));
    }

    #[test]
    fn or_position_errors() {
        assert!(lex("|abc").is_err());
        assert!(lex("abc|").is_err());
        assert!(lex("a||b").is_err());
    }
}
