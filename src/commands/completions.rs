//! # Completions Command Implementation
//!
//! Generates shell completion scripts for the `undercloud` command with
//! `clap_complete`. The script is written to stdout.
//!
//! ## Example
//!
//! ```bash
//! undercloud completions bash > ~/.local/share/bash-completion/completions/undercloud
//! undercloud completions zsh > ~/.zfunc/_undercloud
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::Cli;

/// Shell types for completion generation
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Fish Shell
    Fish,
    /// PowerShell
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish Shell
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout())
}

fn write_completions(shell: CompletionShell, buf: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(Shell::from(shell), &mut cmd, "undercloud", buf);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_mention_subcommands() {
        let mut buf = Vec::new();
        write_completions(CompletionShell::Bash, &mut buf).unwrap();
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("undercloud"));
        assert!(script.contains("deploy"));
        assert!(script.contains("passwords"));
    }

    #[test]
    fn test_every_shell_generates_output() {
        for shell in CompletionShell::value_variants() {
            let mut buf = Vec::new();
            write_completions(*shell, &mut buf).unwrap();
            assert!(!buf.is_empty(), "{:?} produced no output", shell);
        }
    }
}
