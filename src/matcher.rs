use crate::atom::{try_match, Atom};
use crate::error::SyntaxError;
use crate::lexer::lex;
use crate::match_record::Match;
use crate::parser::parse;
use crate::state::MatchState;

/// Knobs accepted at compile time. Only `case_insensitive` is consulted by
/// the matcher today; the rest are reserved for future use and are not
/// read anywhere in this crate yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub case_insensitive: bool,
    pub multiline: bool,
    pub singleline: bool,
    pub unicode: bool,
}

/// A pattern compiled down to an atom tree, ready to match against input.
/// Cheap to clone — the tree itself is immutable once built.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    root: Atom,
    group_count: u16,
    min_length: usize,
}

impl CompiledPattern {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn group_count(&self) -> u16 {
        self.group_count
    }

    /// Attempts a match anchored exactly at `pos`. Unlike `find`, this
    /// never advances — a zero-length match at `pos` is also rejected,
    /// mirroring the origin engine's `matchAt`.
    pub fn match_at(&self, input: &[u8], pos: usize) -> Option<Match> {
        if pos > input.len() {
            return None;
        }
        let mut state = MatchState::new(self.group_count);
        let consumed = try_match(&self.root, input, pos, &mut state)?;
        if consumed == 0 {
            return None;
        }
        let mut m = Match::new();
        state.commit(&mut m, input);
        Some(m)
    }

    /// Scans forward from `start_pos`, returning the first match found.
    pub fn find(&self, input: &[u8], start_pos: usize) -> Option<Match> {
        let mut pos = start_pos;
        while pos + self.min_length <= input.len() {
            if let Some(m) = self.match_at(input, pos) {
                return Some(m);
            }
            pos += 1;
        }
        None
    }

    /// Iterates all non-overlapping matches left to right, each search
    /// resuming right after the previous match ended.
    pub fn find_iter<'p, 'i>(&'p self, input: &'i [u8]) -> FindIter<'p, 'i> {
        FindIter { pattern: self, input, pos: 0, done: false }
    }

    pub fn find_all(&self, input: &[u8]) -> Vec<Match> {
        self.find_iter(input).collect()
    }
}

pub struct FindIter<'p, 'i> {
    pattern: &'p CompiledPattern,
    input: &'i [u8],
    pos: usize,
    done: bool,
}

impl<'p, 'i> Iterator for FindIter<'p, 'i> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.done || self.pos > self.input.len() {
            return None;
        }
        match self.pattern.find(self.input, self.pos) {
            Some(m) => {
                let len = m.length();
                // Zero-length matches can't actually reach here because
                // `match_at` already rejects them, but advancing by at
                // least 1 keeps this loop safe regardless.
                self.pos = m.start() + if len == 0 { 1 } else { len };
                Some(m)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Compiles `pattern` with the simple case-sensitivity switch, matching
/// spec.md's primary entry point.
pub fn compile(pattern: &str, case_insensitive: bool) -> Result<CompiledPattern, SyntaxError> {
    compile_with_options(pattern, CompileOptions { case_insensitive, ..CompileOptions::default() })
}

pub fn compile_with_options(pattern: &str, options: CompileOptions) -> Result<CompiledPattern, SyntaxError> {
    let tokens = lex(pattern)?;
    let (root, group_count) = parse(tokens, options.case_insensitive)?;
    let min_length = root.min_length();
    Ok(CompiledPattern { pattern: pattern.to_string(), root, group_count, min_length })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(pattern: &str, input: &str) -> Option<Match> {
        compile(pattern, false).unwrap().find(input.as_bytes(), 0)
    }

    #[test]
    fn literal_match() {
        assert_eq!(m("abc", "xxabcyy").unwrap().value(), "abc");
    }

    #[test]
    fn greedy_vs_lazy() {
        assert_eq!(m("a.*b", "axbxb").unwrap().value(), "axbxb");
        assert_eq!(m("a.*?b", "axbxb").unwrap().value(), "axb");
    }

    #[test]
    fn capture_groups() {
        let mat = m(r"(\d+)-(\d+)", "id 42-7 done").unwrap();
        assert_eq!(mat.group_value(1), "42");
        assert_eq!(mat.group_value(2), "7");
    }

    #[test]
    fn alternation() {
        assert!(m("cat|dog", "I have a dog").is_some());
        assert!(m("cat|dog", "I have a bird").is_none());
    }

    #[test]
    fn anchors() {
        let p = compile("^abc$", false).unwrap();
        assert!(p.match_at(b"abc", 0).is_some());
        assert!(p.match_at(b"xabc", 1).is_none());
    }

    #[test]
    fn case_insensitive_option() {
        assert!(compile("ABC", true).unwrap().find(b"xx abc", 0).is_some());
        assert!(compile("ABC", false).unwrap().find(b"xx abc", 0).is_none());
    }

    #[test]
    fn find_all_multiple_matches() {
        let p = compile(r"\d+", false).unwrap();
        let found: Vec<String> = p.find_all(b"a1 b22 c333").iter().map(|m| m.value()).collect();
        assert_eq!(found, vec!["1", "22", "333"]);
    }

    #[test]
    fn non_capturing_group() {
        let mat = m(r"(?:ab)+(c)", "ababc").unwrap();
        assert_eq!(mat.value(), "ababc");
        assert_eq!(mat.group_value(1), "c");
    }

    #[test]
    fn syntax_error_propagates() {
        assert!(compile("*abc", false).is_err());
    }
}
