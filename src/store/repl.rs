//! Interactive REPL (Read-Eval-Print Loop) for verstore.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use super::api::{Store, StoreResult};
use super::output::CommandOutput;

/// REPL configuration.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string. Empty disables the prompt.
    pub prompt: String,
    /// Print the banner on start.
    pub banner: bool,
    /// Render results as JSON lines instead of text.
    pub json: bool,
    /// Show timing information.
    pub timing: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "verstore> ".into(),
            banner: true,
            json: false,
            timing: false,
        }
    }
}

/// The interactive REPL.
pub struct Repl {
    store: Store,
    config: ReplConfig,
    history: Vec<String>,
}

impl Repl {
    /// Create a REPL with custom configuration.
    pub fn with_config(store: Store, config: ReplConfig) -> Self {
        Self {
            store,
            config,
            history: Vec::new(),
        }
    }

    /// Run the REPL on the process's stdin, stdout and stderr.
    pub fn run(&mut self) -> StoreResult<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.run_with(stdin.lock(), stdout.lock(), stderr.lock())
    }

    /// Run the REPL until EOF or EXIT.
    ///
    /// Command errors go to `err` and the loop continues.
    pub fn run_with<R, W, E>(&mut self, mut input: R, mut out: W, mut err: E) -> StoreResult<()>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        if self.config.banner {
            self.print_banner(&mut out)?;
        }

        let mut line = String::new();
        loop {
            if !self.config.prompt.is_empty() {
                write!(out, "{}", self.config.prompt)?;
                out.flush()?;
            }

            line.clear();
            if input.read_line(&mut line)? == 0 {
                // EOF.
                break;
            }

            let cmd = line.trim_end_matches(&['\n', '\r'][..]);
            if cmd.trim().is_empty() {
                continue;
            }
            self.history.push(cmd.to_string());

            if cmd.starts_with('.') {
                if self.handle_meta(cmd, &mut out, &mut err)? {
                    break;
                }
                continue;
            }

            let start = Instant::now();
            match self.store.execute(cmd) {
                Ok(output) => {
                    self.print_output(&output, &mut out)?;
                    if self.config.timing {
                        writeln!(out, "Time: {:.3}ms", start.elapsed().as_secs_f64() * 1000.0)?;
                    }
                    if output.is_exit() {
                        break;
                    }
                }
                Err(e) => {
                    writeln!(err, "Error: {}", e)?;
                    if !self.config.json {
                        writeln!(out)?;
                    }
                }
            }
        }

        out.flush()?;
        Ok(())
    }

    fn print_banner<W: Write>(&self, out: &mut W) -> StoreResult<()> {
        writeln!(out, "verstore v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "Type HELP for commands, .help for shell commands, EXIT to quit.")?;
        writeln!(out)?;
        Ok(())
    }

    fn print_output<W: Write>(&self, output: &CommandOutput, out: &mut W) -> StoreResult<()> {
        if self.config.json {
            writeln!(out, "{}", serde_json::to_string(output)?)?;
        } else {
            writeln!(out, "{}", output)?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Handle a `.command`; returns true if the REPL should exit.
    fn handle_meta<W: Write, E: Write>(
        &mut self,
        cmd: &str,
        out: &mut W,
        err: &mut E,
    ) -> StoreResult<bool> {
        let parts: Vec<&str> = cmd.trim_start_matches('.').split_whitespace().collect();
        let command = parts.first().map(|s| s.to_lowercase());

        match command.as_deref() {
            Some("help") | Some("h") | Some("?") => self.print_help(out)?,
            Some("quit") | Some("exit") | Some("q") => return Ok(true),
            Some("files") | Some("ls") => {
                let files = self.store.files();
                if files.is_empty() {
                    writeln!(out, "No files.")?;
                } else {
                    for file in files {
                        writeln!(out, "  {}", file)?;
                    }
                }
            }
            Some("stats") => {
                let stats = self.store.stats();
                writeln!(out, "Store Statistics:")?;
                writeln!(out, "  Files: {}", stats.files)?;
                writeln!(out, "  Versions: {}", stats.total_versions)?;
                writeln!(out, "  Snapshots: {}", stats.total_snapshots)?;
            }
            Some("history") => {
                writeln!(out, "Command History:")?;
                for (i, cmd) in self.history.iter().enumerate() {
                    writeln!(out, "  {}: {}", i + 1, cmd)?;
                }
            }
            Some("timing") => {
                self.config.timing = !self.config.timing;
                writeln!(out, "Timing: {}", if self.config.timing { "on" } else { "off" })?;
            }
            Some("json") => {
                self.config.json = !self.config.json;
                writeln!(out, "JSON output: {}", if self.config.json { "on" } else { "off" })?;
            }
            Some(other) => {
                writeln!(err, "Unknown shell command: .{}", other)?;
                writeln!(err, "Type .help for available shell commands")?;
            }
            None => {}
        }

        Ok(false)
    }

    fn print_help<W: Write>(&self, out: &mut W) -> StoreResult<()> {
        writeln!(out, "Shell commands:")?;
        writeln!(out, "  .help, .h, .?           Show this help message")?;
        writeln!(out, "  .quit, .exit, .q        Exit the REPL")?;
        writeln!(out, "  .files, .ls             List all files")?;
        writeln!(out, "  .stats                  Show store statistics")?;
        writeln!(out, "  .history                Show command history")?;
        writeln!(out, "  .timing                 Toggle timing display")?;
        writeln!(out, "  .json                   Toggle JSON output")?;
        writeln!(out)?;
        writeln!(out, "{}", crate::command::USAGE)?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> ReplConfig {
        ReplConfig {
            prompt: String::new(),
            banner: false,
            ..Default::default()
        }
    }

    fn run(config: ReplConfig, script: &str) -> (String, String) {
        let mut repl = Repl::with_config(Store::new(), config);
        let mut out = Vec::new();
        let mut err = Vec::new();
        repl.run_with(script.as_bytes(), &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let (out, err) = run(quiet(), "READ nope\nCREATE a\nINSERT a hello\nREAD a\n");
        assert_eq!(err, "Error: file not found: nope\n");
        assert!(out.contains("[CREATE] File created: a"));
        assert!(out.contains("[READ] Content of file 'a':\nhello\n"));
    }

    #[test]
    fn test_exit_stops_reading() {
        let (out, _) = run(quiet(), "CREATE a\nEXIT\nCREATE b\n");
        assert!(out.contains("Exiting..."));
        assert!(!out.contains("File created: b"));
    }

    #[test]
    fn test_windows_line_endings() {
        let (out, err) = run(quiet(), "CREATE a\r\nINSERT a x\r\nREAD a\r\n");
        assert!(err.is_empty());
        assert!(out.contains("Content of file 'a':\nx\n"));
    }

    #[test]
    fn test_json_mode() {
        let config = ReplConfig {
            json: true,
            ..quiet()
        };
        let (out, _) = run(config, "CREATE a\n");
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["kind"], "created");
        assert_eq!(value["file"], "a");
    }

    #[test]
    fn test_meta_commands() {
        let script = "CREATE a\n.files\n.stats\n.history\n.bogus\n.quit\nCREATE b\n";
        let (out, err) = run(quiet(), script);
        assert!(out.contains("  a\n"));
        assert!(out.contains("Files: 1"));
        assert!(out.contains("2: .files"));
        assert!(err.contains("Unknown shell command: .bogus"));
        assert!(!out.contains("File created: b"));
    }

    #[test]
    fn test_banner_and_prompt() {
        let (out, _) = run(ReplConfig::default(), "");
        assert!(out.starts_with("verstore v"));
        assert!(out.ends_with("verstore> "));
    }
}
