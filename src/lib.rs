//! A small backtracking regex engine: lex a pattern, parse it into an atom
//! tree, and walk that tree against byte input. See [`compile`] for the
//! main entry point and [`format`] for rendering matches through a
//! substitution template.
//!
//! Patterns operate on raw bytes rather than `char`/`String` — this engine
//! is 8-bit only by design, not a Unicode-aware regex implementation.

pub mod atom;
pub mod error;
pub mod format;
pub mod lexer;
pub mod match_record;
pub mod matcher;
pub mod parser;
pub mod state;
pub mod token;

pub use error::{FormatError, SyntaxError};
pub use format::{compile_format, CompiledFormat};
pub use match_record::{Capture, Group, Match};
pub use matcher::{compile, compile_with_options, CompiledPattern, CompileOptions, FindIter};
