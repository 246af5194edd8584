use std::io::{self, BufRead, Write};

use observer_core::Confirm;

/// Ask a yes/no question; end of input counts as the default
pub fn prompt_confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: bool,
) -> io::Result<bool> {
    let mut line = String::new();

    loop {
        line.clear();

        if default {
            write!(output, "{} (Y/n): ", prompt)?;
        } else {
            write!(output, "{} (y/N): ", prompt)?;
        }
        output.flush()?;

        if input.read_line(&mut line)? == 0 {
            return Ok(default);
        }

        match line.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => return Ok(default),
            _ => continue,
        }
    }
}

/// Read one free-form answer; blank or missing input yields `None`
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}: ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

/// Manual time zone prompt used when a session records none
pub fn ask_timezone() -> Option<String> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    prompt_line(
        &mut input,
        &mut io::stdout(),
        "Time zone of the session (US/Eastern, US/Central, ...; blank for default)",
    )
    .ok()
    .flatten()
}

/// Confirms on stdin unless `--yes` was given
pub struct StdinConfirm {
    assume_yes: bool,
}

impl StdinConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let stdin = io::stdin();
        let mut input = stdin.lock();
        prompt_confirm(&mut input, &mut io::stdout(), message, false).unwrap_or(false)
    }
}
