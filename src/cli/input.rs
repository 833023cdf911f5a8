//! Line-oriented prompts for the interactive menus.

use std::io::{self, BufRead, Write};

/// Print `prompt` and read one trimmed line. `None` means stdin is closed.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    let answer = read_line(&format!("{} [y/N] ", prompt))?;
    Ok(answer.is_some_and(|a| is_yes(&a)))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s" | "sim")
}

/// Wait for Enter.
pub fn pause() -> io::Result<()> {
    read_line("\nPress Enter to continue...")?;
    Ok(())
}

/// Parse a 1-based menu choice into an index below `len`.
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}
