use crate::error::FormatError;
use crate::match_record::Match;

#[derive(Debug, Clone)]
enum FormatPart {
    Literal(String),
    Group(u16),
}

/// A compiled substitution template such as `<1>-<2>` or `found: <0>`.
/// Group references are `<N>`; a literal `<` that isn't followed by a
/// digit is passed through as-is, and `<<` is the escape for a single
/// literal `<`.
#[derive(Debug, Clone)]
pub struct CompiledFormat {
    parts: Vec<FormatPart>,
}

impl CompiledFormat {
    pub fn render(&self, m: &Match) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                FormatPart::Literal(s) => out.push_str(s),
                FormatPart::Group(g) => out.push_str(&m.group_value(*g)),
            }
        }
        out
    }
}

pub fn compile_format(template: &str) -> Result<CompiledFormat, FormatError> {
    let chars: Vec<char> = template.chars().collect();
    let mut parts = Vec::new();
    let mut lit = String::new();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];

        if c != '<' {
            lit.push(c);
            i += 1;
            continue;
        }

        let next_is_digit = i + 1 < chars.len() && chars[i + 1].is_ascii_digit();
        if !next_is_digit {
            // `<<` is the escape for a single literal `<`; any other `<` not
            // followed by a digit is also passed through as a literal `<`.
            lit.push('<');
            if i + 1 < chars.len() && chars[i + 1] == '<' {
                i += 1;
            }
            i += 1;
            continue;
        }

        i += 1; // past the opening '<'
        if !lit.is_empty() {
            parts.push(FormatPart::Literal(std::mem::take(&mut lit)));
        }

        let gnum_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }

        if i < chars.len() && chars[i] == '>' {
            let gnum: String = chars[gnum_start..i].iter().collect();
            let group: u16 = gnum.parse().map_err(|_| FormatError::new("Group number out of range", gnum_start))?;
            parts.push(FormatPart::Group(group));
            i += 1; // past the closing '>'
        } else {
            return Err(FormatError::new(
                "Invalid group reference. Provide a group number followed by a closing '>', or escape the opening '<' with another one right before it",
                i,
            ));
        }
    }

    if !lit.is_empty() {
        parts.push(FormatPart::Literal(lit));
    }

    Ok(CompiledFormat { parts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::compile;

    fn render(pattern: &str, input: &str, template: &str) -> String {
        let p = compile(pattern, false).unwrap();
        let m = p.find(input.as_bytes(), 0).unwrap();
        compile_format(template).unwrap().render(&m)
    }

    #[test]
    fn literal_passthrough() {
        assert_eq!(compile_format("hello").unwrap().render(&Match::new()), "hello");
    }

    #[test]
    fn group_substitution() {
        assert_eq!(render(r"(\d+)-(\d+)", "42-7", "<2>/<1>"), "7/42");
    }

    #[test]
    fn whole_match_group_zero() {
        assert_eq!(render(r"\d+", "x99y", "[<0>]"), "[99]");
    }

    #[test]
    fn lone_angle_bracket_passes_through() {
        assert_eq!(compile_format("a < b").unwrap().render(&Match::new()), "a < b");
    }

    #[test]
    fn doubled_angle_bracket_is_literal_escape() {
        assert_eq!(compile_format("<<").unwrap().render(&Match::new()), "<");
        assert_eq!(compile_format("<<1>").unwrap().render(&Match::new()), "<1>");
    }

    #[test]
    fn missing_closing_angle_is_format_error() {
        assert!(compile_format("<1 no close").is_err());
    }

    #[test]
    fn out_of_range_group_renders_empty() {
        let m = Match::new();
        assert_eq!(compile_format("<5>").unwrap().render(&m), "");
    }
}
