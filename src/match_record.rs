/// One recorded slice of the input, owned by a `Group`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub start: usize,
    pub length: usize,
    pub value: String,
}

/// All captures made for one group number across a single match attempt.
/// A group inside a quantifier can capture more than once; the last
/// capture is the one most callers want, but every capture is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub captures: Vec<Capture>,
}

impl Group {
    pub fn value(&self) -> String {
        self.captures.iter().map(|c| c.value.as_str()).collect()
    }

    pub fn length(&self) -> usize {
        self.captures.iter().map(|c| c.length).sum()
    }

    pub fn start(&self) -> usize {
        self.captures.first().map(|c| c.start).unwrap_or(0)
    }
}

/// The result of a successful match: group 0 is the whole match, groups
/// 1..N are capturing parentheses in left-to-right order of their opening
/// delimiter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Match {
    groups: Vec<Group>,
}

impl Match {
    pub fn new() -> Self {
        Match::default()
    }

    pub fn group(&self, i: u16) -> Option<&Group> {
        self.groups.get(i as usize)
    }

    pub fn group_value(&self, i: u16) -> String {
        self.groups.get(i as usize).map(|g| g.value()).unwrap_or_default()
    }

    pub fn add_group_capture(&mut self, group: u16, cap: Capture) {
        let idx = group as usize;
        if idx >= self.groups.len() {
            self.groups.resize(idx + 1, Group::default());
        }
        self.groups[idx].captures.push(cap);
    }

    pub fn start(&self) -> usize {
        self.group(0).map(|g| g.start()).unwrap_or(0)
    }

    pub fn length(&self) -> usize {
        self.group(0).map(|g| g.length()).unwrap_or(0)
    }

    pub fn value(&self) -> String {
        self.group_value(0)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
