//! Thin demonstration binary for the `rex` library: a grep-like tool that
//! prints lines matching a pattern. Not part of the library's public
//! contract — a consumer, like any other.

use std::fs;
use std::io::{self, BufRead};
use std::process;

use anyhow::{Context, Result};
use rex::CompiledPattern;

struct Config {
    pattern: String,
    case_insensitive: bool,
    paths: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Config> {
    let mut case_insensitive = false;
    let mut rest = Vec::new();

    for arg in args {
        if arg == "-i" {
            case_insensitive = true;
        } else {
            rest.push(arg.clone());
        }
    }

    let pattern = rest.first().cloned().context("usage: grep_cli [-i] <pattern> [file...]")?;
    let paths = rest[1..].to_vec();

    Ok(Config { pattern, case_insensitive, paths })
}

fn search_reader(pattern: &CompiledPattern, reader: impl BufRead, name: Option<&str>, show_filename: bool) -> Result<bool> {
    let mut matched_any = false;

    for line in reader.lines() {
        let line = line.context("failed to read line")?;
        if pattern.find(line.as_bytes(), 0).is_some() {
            matched_any = true;
            if show_filename {
                println!("{}:{}", name.unwrap_or(""), line);
            } else {
                println!("{}", line);
            }
        }
    }

    Ok(matched_any)
}

fn run() -> Result<bool> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = parse_args(&args)?;
    let pattern = rex::compile(&cfg.pattern, cfg.case_insensitive).map_err(|e| anyhow::anyhow!(e))?;

    if cfg.paths.is_empty() {
        let stdin = io::stdin();
        return search_reader(&pattern, stdin.lock(), None, false);
    }

    let show_filename = cfg.paths.len() > 1;
    let mut matched_any = false;
    for path in &cfg.paths {
        let content = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
        if search_reader(&pattern, content.as_bytes(), Some(path), show_filename)? {
            matched_any = true;
        }
    }
    Ok(matched_any)
}

fn main() {
    match run() {
        Ok(matched) => process::exit(if matched { 0 } else { 1 }),
        Err(e) => {
            eprintln!("grep_cli: {e:#}");
            process::exit(2);
        }
    }
}
