use anyhow::Result;

/// Where nudges are shown to the user. Delivery is fire-and-forget; an `Err`
/// is only logged by the caller.
pub trait NudgeSurface: Send + Sync {
    fn deliver(&self, message: &str, reasoning: &str) -> Result<()>;
}

/// Prints nudges to stdout in a framed block.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSurface;

impl NudgeSurface for ConsoleSurface {
    fn deliver(&self, message: &str, reasoning: &str) -> Result<()> {
        use std::io::Write;

        let rule = "=".repeat(60);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout)?;
        writeln!(stdout, "{rule}")?;
        writeln!(stdout, "NUDGE")?;
        writeln!(stdout, "{rule}")?;
        writeln!(stdout)?;
        writeln!(stdout, "{message}")?;
        writeln!(stdout)?;
        writeln!(stdout, "(why: {reasoning})")?;
        writeln!(stdout, "{rule}")?;
        stdout.flush()?;
        Ok(())
    }
}
