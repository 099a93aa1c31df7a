use crate::match_record::{Capture, Match};

#[derive(Debug, Clone, Copy)]
struct PendingCap {
    start: usize,
    length: usize,
}

impl PendingCap {
    fn finish(self, input: &[u8]) -> Capture {
        Capture { start: self.start, length: self.length, value: String::from_utf8_lossy(&input[self.start..self.start + self.length]).into_owned() }
    }
}

/// Per-attempt bookkeeping of pending captures. One stack of `PendingCap`
/// per group; a group inside a quantifier may capture multiple times, so a
/// capture is only truly finished once the whole attempt succeeds.
pub struct MatchState {
    group_caps: Vec<Vec<PendingCap>>,
}

impl MatchState {
    pub fn new(group_count: u16) -> Self {
        MatchState { group_caps: vec![Vec::new(); group_count as usize] }
    }

    pub fn start_new_capture(&mut self, group: u16, start: usize) {
        self.group_caps[group as usize].push(PendingCap { start, length: 0 });
    }

    pub fn end_capture(&mut self, group: u16, end_pos: usize) {
        let cap = self.group_caps[group as usize].last_mut().expect("end_capture with no pending capture");
        cap.length = end_pos - cap.start;
    }

    pub fn pop_capture(&mut self, group: u16) {
        self.group_caps[group as usize].pop();
    }

    pub fn reset_group(&mut self, group: u16) {
        self.group_caps[group as usize].clear();
    }

    pub fn commit(&mut self, m: &mut Match, input: &[u8]) {
        for (group, caps) in self.group_caps.iter().enumerate() {
            for cap in caps {
                m.add_group_capture(group as u16, cap.finish(input));
            }
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        for caps in &mut self.group_caps {
            caps.clear();
        }
    }
}
