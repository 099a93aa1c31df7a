/// One lexical unit of a pattern. No `Empty` variant exists here on purpose:
/// a token under construction is `None` in the lexer until it is complete,
/// so an empty token can never be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Literal,
    CharRange,
    Special,
    StartCharClass,
    EndCharClass,
    Caret,
    Dollar,
    Dot,
    OrOp,
    GreedyPlus,
    GreedyStar,
    GreedyQMark,
    LazyPlus,
    LazyStar,
    LazyQMark,
    StaticQuan,
    GreedyMinQuan,
    LazyMinQuan,
    GreedyRangeQuan,
    LazyRangeQuan,
    StartGroup,
    EndGroup,
}

impl TokenKind {
    pub fn is_quantifier(self) -> bool {
        matches!(
            self,
            TokenKind::GreedyPlus
                | TokenKind::GreedyStar
                | TokenKind::GreedyQMark
                | TokenKind::LazyPlus
                | TokenKind::LazyStar
                | TokenKind::LazyQMark
                | TokenKind::StaticQuan
                | TokenKind::GreedyMinQuan
                | TokenKind::LazyMinQuan
                | TokenKind::GreedyRangeQuan
                | TokenKind::LazyRangeQuan
        )
    }
}

/// `value` holds the decoded bytes of the token (e.g. the single byte an
/// escape decodes to, or the two endpoint bytes of a char range). It is
/// `Vec<u8>` rather than `String` because decoding `\xFF`-style escapes can
/// produce bytes that are not valid UTF-8 on their own.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
    pub original_text: String,
    pub value: Vec<u8>,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize, original_text: impl Into<String>, value: Vec<u8>) -> Self {
        Token { kind, position, original_text: original_text.into(), value }
    }
}
