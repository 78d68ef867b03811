use std::fmt;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::application::{AppError, FixedPin, PinGate, PinPrompt, TrackerService};
use crate::config::Config;
use crate::domain::Category;

use super::{CommandParseError, ShellCommand};

pub const PIN_PROMPT: &str = "Enter your 4-digit PIN: ";
pub const COMMAND_PROMPT: &str = "> ";
pub const LOCKED_MESSAGE: &str = "Maximum attempts exceeded. Exiting application.";
pub const INVALID_INPUT_MESSAGE: &str = "Input is not valid UTF-8";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The PIN gate was passed and the user left the shell.
    Finished,
    /// The PIN gate refused entry; no ledger was created.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// Line-oriented input and output for a session.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one line without its line ending. `None` at end of input.
    ///
    /// A line that is not valid UTF-8 is consumed and reported as
    /// `ErrorKind::InvalidData`, so the next read starts on the following line.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    pub fn println(&mut self, message: impl fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    pub fn print(&mut self, message: impl fmt::Display) -> io::Result<()> {
        write!(self.output, "{}", message)?;
        self.output.flush()
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> PinPrompt for Terminal<R, W> {
    fn read_pin(&mut self) -> Option<String> {
        match self.prompt(PIN_PROMPT) {
            Ok(input) => input,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read PIN");
                None
            }
        }
    }

    fn rejected(&mut self, remaining: u32) {
        let message = format!("Invalid PIN. Attempts remaining: {}", remaining);
        if let Err(err) = self.println(message) {
            tracing::warn!(error = %err, "failed to report rejected PIN");
        }
    }
}

/// Run the PIN gate and, once it passes, the command loop.
///
/// The tracker service, and with it the ledger, is only created after the
/// gate accepts a PIN.
pub fn run_session<R: BufRead, W: Write>(
    config: &Config,
    input: R,
    output: W,
) -> Result<SessionOutcome> {
    let mut terminal = Terminal::new(input, output);
    run_with_terminal(config, &mut terminal)
}

pub fn run_with_terminal<R: BufRead, W: Write>(
    config: &Config,
    terminal: &mut Terminal<R, W>,
) -> Result<SessionOutcome> {
    let gate = PinGate::with_attempts(FixedPin::new(config.pin.clone()), config.max_attempts);
    if !gate.authenticate(terminal) {
        terminal.println(LOCKED_MESSAGE)?;
        return Ok(SessionOutcome::Locked);
    }

    let mut shell = Shell::new(config, TrackerService::new(config.currency.clone()), terminal);
    shell.run()?;
    Ok(SessionOutcome::Finished)
}

/// The interactive command loop over an authenticated session.
pub struct Shell<'a, R, W> {
    config: &'a Config,
    service: TrackerService,
    terminal: &'a mut Terminal<R, W>,
    today: fn() -> NaiveDate,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(
        config: &'a Config,
        service: TrackerService,
        terminal: &'a mut Terminal<R, W>,
    ) -> Self {
        Self {
            config,
            service,
            terminal,
            today: || Local::now().date_naive(),
        }
    }

    pub fn service(&self) -> &TrackerService {
        &self.service
    }

    pub fn run(&mut self) -> Result<()> {
        self.terminal.println("Expense tracker ready. Type 'help' for commands.")?;

        loop {
            let line = match self.terminal.prompt(COMMAND_PROMPT) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.terminal.println("")?;
                    break;
                }
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    tracing::warn!(error = %err, "skipping unreadable command line");
                    self.terminal.println(INVALID_INPUT_MESSAGE)?;
                    continue;
                }
                Err(err) => return Err(err).context("Failed to read command"),
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if self.handle_line(line)? == LoopControl::Exit {
                break;
            }
        }

        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<LoopControl> {
        match ShellCommand::parse_line(line) {
            Ok(command) => self.execute(command),
            Err(CommandParseError::Usage(err)) => {
                // Help and usage text come back from clap as errors.
                self.terminal.print(err)?;
                Ok(LoopControl::Continue)
            }
            Err(err) => {
                self.terminal.println(err)?;
                Ok(LoopControl::Continue)
            }
        }
    }

    fn execute(&mut self, command: ShellCommand) -> Result<LoopControl> {
        match command {
            ShellCommand::Add {
                amount,
                category,
                date,
            } => {
                let date = date.unwrap_or_else(self.today);
                match self.service.add_expense(&amount, category, date) {
                    Ok(_) => self.show_report()?,
                    Err(err) => self.report_error(err)?,
                }
            }

            ShellCommand::Delete {
                amount,
                category,
                date,
            } => {
                let date = date.unwrap_or_else(self.today);
                match self.service.delete_expense(&amount, category, date) {
                    Ok(_) => self.show_report()?,
                    Err(err) => self.report_error(err)?,
                }
            }

            ShellCommand::Show => self.show_report()?,

            ShellCommand::Day { date } => match self.service.daily_total(date) {
                Some(total) => {
                    let line = format!("{}: {}", date, self.service.format_amount(total));
                    self.terminal.println(line)?;
                }
                None => self.terminal.println(format_args!("No data for {}", date))?,
            },

            ShellCommand::Month { month } => match self.service.monthly_total(month) {
                Some(total) => {
                    let line = format!("{}: {}", month, self.service.format_amount(total));
                    self.terminal.println(line)?;
                }
                None => self.terminal.println(format_args!("No data for {}", month))?,
            },

            ShellCommand::Categories => {
                for category in Category::ALL {
                    self.terminal.println(format_args!("  {}", category))?;
                }
            }

            ShellCommand::Export { output, format } => {
                let path = output.unwrap_or_else(|| self.config.export_path.clone());
                let format = format.unwrap_or(self.config.export_format);
                match self.service.export(&path, format) {
                    Ok(summary) => self.terminal.println(format_args!(
                        "Report exported to {}",
                        summary.path.display()
                    ))?,
                    Err(err) => self.report_error(err)?,
                }
            }

            ShellCommand::Clear { yes } => {
                if yes || self.confirm("Clear all data? [y/N] ")? {
                    self.service.clear();
                    self.terminal.println("All data cleared.")?;
                } else {
                    self.terminal.println("Nothing cleared.")?;
                }
            }

            ShellCommand::Quit => return Ok(LoopControl::Exit),
        }

        Ok(LoopControl::Continue)
    }

    fn show_report(&mut self) -> io::Result<()> {
        let report = self.service.render_report();
        self.terminal.print(report)
    }

    fn report_error(&mut self, err: AppError) -> io::Result<()> {
        self.terminal.println(err)
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = match self.terminal.prompt(question) {
            Err(err) if err.kind() == io::ErrorKind::InvalidData => None,
            answer => answer?,
        };
        Ok(matches!(
            answer.as_deref().map(|a| a.trim().to_ascii_lowercase()).as_deref(),
            Some("y" | "yes")
        ))
    }
}
