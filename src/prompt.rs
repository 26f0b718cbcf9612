// src/prompt.rs

//! Interactive prompts
//!
//! Line-oriented questions for the interactive export flow. Every prompt is
//! generic over its reader and writer so tests can script the answers; end
//! of input always selects the default instead of looping.

use crate::error::Result;
use crate::nuget::framework::{FrameworkChooser, FrameworkResolver, ProfileSet};
use std::io::{self, BufRead, Write};

/// Ask `prompt` and return the trimmed answer, or `default` on empty input
pub fn read_input<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: &str,
) -> Result<String> {
    if default.is_empty() {
        write!(output, "{}: ", prompt)?;
    } else {
        write!(output, "{} [{}]: ", prompt, default)?;
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

/// `read_input` on stdin/stdout
pub fn get_user_input(prompt: &str, default: &str) -> Result<String> {
    let stdin = io::stdin();
    read_input(&mut stdin.lock(), &mut io::stdout(), prompt, default)
}

/// Numbered framework menu; Enter accepts the resolver's recommendation
pub struct InteractiveSelect<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveSelect<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl InteractiveSelect<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> FrameworkChooser for InteractiveSelect<R, W> {
    fn choose(&mut self, profiles: &ProfileSet, resolver: &FrameworkResolver) -> Result<String> {
        let recommended = resolver.resolve(profiles)?;
        let names: Vec<&String> = profiles.iter().collect();
        let default_index = names
            .iter()
            .position(|n| **n == recommended)
            .map(|i| i + 1)
            .unwrap_or(1);

        writeln!(self.output)?;
        writeln!(self.output, "Available target frameworks:")?;
        for (i, name) in names.iter().enumerate() {
            if **name == recommended {
                writeln!(self.output, "  {}) {} (recommended)", i + 1, name)?;
            } else {
                writeln!(self.output, "  {}) {}", i + 1, name)?;
            }
        }

        loop {
            write!(self.output, "Select a framework [{}]: ", default_index)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(recommended);
            }
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(recommended);
            }
            if let Ok(n) = answer.parse::<usize>()
                && (1..=names.len()).contains(&n)
            {
                return Ok(names[n - 1].clone());
            }
            if let Some(name) = names.iter().find(|n| n.eq_ignore_ascii_case(answer)) {
                return Ok((*name).clone());
            }
            writeln!(self.output, "Invalid choice '{}'", answer)?;
        }
    }
}
