use crate::state::MatchState;

/// A node in the compiled pattern tree. `next` is whatever follows this
/// atom in its enclosing sequence; composites (`Or`, the quantifiers) own
/// their children as independent sub-trees with their own (usually empty)
/// `next`, which is only filled in once something is appended after them.
#[derive(Debug, Clone)]
pub struct Atom {
    pub kind: AtomKind,
    pub next: Option<Box<Atom>>,
}

#[derive(Debug, Clone)]
pub enum AtomKind {
    Literal { ch: u8, case_insensitive: bool },
    Range { lo: u8, hi: u8 },
    AnyChar,
    /// Negates a fixed-width inner match, consuming `step` bytes on success.
    Inversion { inner: Box<Atom>, step: usize },
    Or { branches: Vec<Atom> },
    Greedy { inner: Box<Atom>, min: usize, max: usize, sub_groups: Vec<u16> },
    Lazy { inner: Box<Atom>, min: usize, max: usize, sub_groups: Vec<u16> },
    BeginString,
    EndString,
    BeginLine,
    EndLine,
    WordBoundary,
    GroupStart { group: u16 },
    GroupEnd { group: u16 },
    /// Wraps the whole compiled pattern; its inner sequence is implicitly
    /// group 0, the whole match.
    Root { inner: Box<Atom> },
}

impl Atom {
    pub fn new(kind: AtomKind) -> Self {
        Atom { kind, next: None }
    }

    /// Appends `tail` to the end of this atom's chain. `next` is shared by
    /// every atom kind uniformly — `Or`'s branches hold only the
    /// alternation's own content, never a copy of what follows it; the
    /// continuation is threaded in once, at the `Or` node itself, and
    /// `try_match` reaches it via the ordinary `try_next` call after a
    /// branch succeeds.
    pub fn append(mut self, tail: Atom) -> Atom {
        self.next = Some(match self.next {
            Some(n) => Box::new(n.append(tail)),
            None => Box::new(tail),
        });
        self
    }

    /// Tightest lower bound, in bytes, on how much input a match through
    /// this atom and everything downstream of it can consume.
    pub fn min_length(&self) -> usize {
        let own = match &self.kind {
            AtomKind::Literal { .. } | AtomKind::Range { .. } | AtomKind::AnyChar => 1,
            AtomKind::Inversion { step, .. } => *step,
            AtomKind::Or { branches } => branches.iter().map(Atom::min_length).min().unwrap_or(0),
            AtomKind::Greedy { inner, min, .. } | AtomKind::Lazy { inner, min, .. } => inner.min_length() * min,
            AtomKind::BeginString
            | AtomKind::EndString
            | AtomKind::BeginLine
            | AtomKind::EndLine
            | AtomKind::WordBoundary
            | AtomKind::GroupStart { .. }
            | AtomKind::GroupEnd { .. } => 0,
            AtomKind::Root { inner } => return inner.min_length(),
        };
        own + self.next.as_ref().map(|n| n.min_length()).unwrap_or(0)
    }
}

fn is_word_char(c: u8) -> bool {
    c == b'-' || c.is_ascii_alphanumeric()
}

/// Attempts to match `atom` (and everything downstream of it) at `pos`.
/// Returns the total number of bytes consumed by `atom` and its successor
/// chain, or `None` on failure.
pub fn try_match(atom: &Atom, input: &[u8], pos: usize, state: &mut MatchState) -> Option<usize> {
    match &atom.kind {
        AtomKind::Literal { ch, case_insensitive } => {
            if pos >= input.len() {
                return None;
            }
            let mut c = input[pos];
            if *case_insensitive {
                c = c.to_ascii_lowercase();
            }
            if c == *ch {
                try_next(atom, input, pos, 1, state)
            } else {
                None
            }
        }
        AtomKind::Range { lo, hi } => {
            if pos >= input.len() {
                return None;
            }
            let c = input[pos];
            if *lo <= c && c <= *hi {
                try_next(atom, input, pos, 1, state)
            } else {
                None
            }
        }
        AtomKind::AnyChar => {
            if pos < input.len() {
                try_next(atom, input, pos, 1, state)
            } else {
                None
            }
        }
        AtomKind::Inversion { inner, step } => {
            if pos >= input.len() {
                return None;
            }
            if try_match(inner, input, pos, state).is_some() {
                return None;
            }
            try_next(atom, input, pos, *step, state)
        }
        AtomKind::Or { branches } => {
            for branch in branches {
                if let Some(r) = try_match(branch, input, pos, state) {
                    if let Some(fin) = try_next(atom, input, pos, r, state) {
                        return Some(fin);
                    }
                }
            }
            None
        }
        AtomKind::Greedy { inner, min, max, sub_groups } => greedy_match(atom, inner, *min, *max, sub_groups, input, pos, state),
        AtomKind::Lazy { inner, min, max, .. } => lazy_match(atom, inner, *min, *max, input, pos, state),
        AtomKind::BeginString => {
            if pos == 0 {
                try_next(atom, input, pos, 0, state)
            } else {
                None
            }
        }
        AtomKind::EndString => {
            if pos == input.len() {
                try_next(atom, input, pos, 0, state)
            } else {
                None
            }
        }
        AtomKind::BeginLine => {
            if pos == 0 || input[pos - 1] == b'\n' {
                try_next(atom, input, pos, 0, state)
            } else {
                None
            }
        }
        // NOTE: peeks at `pos + 1` rather than `pos` — a legacy off-by-one
        // preserved deliberately rather than "fixed".
        AtomKind::EndLine => {
            if pos >= input.len() || (pos + 1 < input.len() && (input[pos + 1] == b'\n' || input[pos + 1] == b'\r')) {
                try_next(atom, input, pos, 0, state)
            } else {
                None
            }
        }
        // Word characters in this dialect include `-`; unusual, preserved.
        AtomKind::WordBoundary => {
            let left = pos > 0 && is_word_char(input[pos - 1]);
            let right = pos < input.len() && is_word_char(input[pos]);
            if left != right {
                try_next(atom, input, pos, 0, state)
            } else {
                None
            }
        }
        AtomKind::GroupStart { group } => {
            state.start_new_capture(*group, pos);
            match try_next(atom, input, pos, 0, state) {
                Some(r) => Some(r),
                None => {
                    state.pop_capture(*group);
                    None
                }
            }
        }
        AtomKind::GroupEnd { group } => match try_next(atom, input, pos, 0, state) {
            Some(r) => {
                state.end_capture(*group, pos);
                Some(r)
            }
            None => None,
        },
        AtomKind::Root { inner } => {
            // Group 0 is the whole match; thread it through the same
            // start/end-capture machinery every other group uses.
            state.start_new_capture(0, pos);
            match try_match(inner, input, pos, state) {
                Some(r) => {
                    state.end_capture(0, pos + r);
                    Some(r)
                }
                None => {
                    state.pop_capture(0);
                    None
                }
            }
        }
    }
}

fn try_next(atom: &Atom, input: &[u8], pos: usize, consumed: usize, state: &mut MatchState) -> Option<usize> {
    match &atom.next {
        None => Some(consumed),
        Some(n) => try_match(n, input, pos + consumed, state).map(|r| consumed + r),
    }
}

fn greedy_match(
    atom: &Atom,
    inner: &Atom,
    min: usize,
    max: usize,
    sub_groups: &[u16],
    input: &[u8],
    pos: usize,
    state: &mut MatchState,
) -> Option<usize> {
    let mut end_positions = vec![pos];
    let mut last_end = pos;

    while end_positions.len() <= max {
        match try_match(inner, input, last_end, state) {
            Some(r) => {
                last_end += r;
                end_positions.push(last_end);
            }
            None => break,
        }
    }

    if end_positions.len() <= min {
        for g in sub_groups {
            state.reset_group(*g);
        }
        return None;
    }

    let mut fin = try_next(atom, input, pos, end_positions[end_positions.len() - 1] - pos, state);
    while fin.is_none() {
        if end_positions.len() - 1 <= min {
            for g in sub_groups {
                state.reset_group(*g);
            }
            return None;
        }
        end_positions.pop();
        for g in sub_groups {
            state.pop_capture(*g);
        }
        fin = try_next(atom, input, pos, end_positions[end_positions.len() - 1] - pos, state);
    }

    fin
}

fn lazy_match(atom: &Atom, inner: &Atom, min: usize, max: usize, input: &[u8], pos: usize, state: &mut MatchState) -> Option<usize> {
    if max == 0 {
        return None;
    }

    let mut total = 0usize;
    let mut count = 0usize;

    loop {
        if count >= min {
            if let Some(fin) = try_next(atom, input, pos, total, state) {
                return Some(fin);
            }
        }

        if count >= max {
            return None;
        }

        match try_match(inner, input, pos + total, state) {
            Some(r) => {
                count += 1;
                total += r;
            }
            None => return None,
        }
    }
}

/// Gathers the group numbers opened anywhere inside `atom`'s own chain
/// (not crossing into an appended successor — callers invoke this before
/// the atom has anything appended to it).
pub fn collect_group_nums(atom: &Atom, out: &mut Vec<u16>) {
    match &atom.kind {
        AtomKind::GroupStart { group } => out.push(*group),
        AtomKind::Or { branches } => {
            for b in branches {
                collect_group_nums(b, out);
            }
        }
        AtomKind::Inversion { inner, .. } | AtomKind::Root { inner } => collect_group_nums(inner, out),
        AtomKind::Greedy { inner, .. } | AtomKind::Lazy { inner, .. } => collect_group_nums(inner, out),
        _ => {}
    }
    if let Some(n) = &atom.next {
        collect_group_nums(n, out);
    }
}
