// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

//! Progress reporting for ripping.
//!
//! The ripping code emits structured events to a [Reporter] and never depends on
//! how, or whether, they are presented.

use std::fmt;
use std::io::Write;
use std::path::Path;

use clap::crate_version;

use super::error::Warning;
use super::extract::{BankStatus, ExtractSummary};
use super::{ByteOrder, DirectoryEntry, Title};

/// Receives ripping events. Every event is optional.
pub trait Reporter {
    fn on_start(&mut self, _rom: &Path) {}
    fn on_detected(&mut self, _title: Title, _order: ByteOrder) {}
    fn on_extracting(&mut self, _output_dir: &Path) {}
    fn on_bank(&mut self, _index: usize, _entry: &DirectoryEntry, _status: BankStatus) {}
    fn on_warning(&mut self, _warning: &Warning) {}
    fn on_fatal(&mut self, _error: &anyhow::Error) {}
    fn on_complete(&mut self, _summary: &ExtractSummary) {}
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

const RESET: &str = "\x1b[0m";
const BLUE: u8 = 14;
const PINK: u8 = 218;
const GREEN: u8 = 115;
const GREY: u8 = 8;
const YELLOW: u8 = 3;

const RULE: &str = "[▪]----------------------------------[▪]";

/// Writes events as (optionally) colored text.
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(std::io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint<'a>(&self, color: u8, text: &'a dyn fmt::Display) -> Painted<'a> {
        Painted {
            color: self.color.then_some(color),
            text,
        }
    }

    fn emit(&mut self, args: fmt::Arguments) {
        if let Err(e) = self.out.write_fmt(args) {
            log::debug!("could not write report: {e}");
        }
    }

    fn prompt(&mut self) {
        let (grey, pink, reset) = if self.color {
            (format!("\x1b[38;5;{GREY}m"), format!("\x1b[38;5;{PINK}m"), RESET)
        } else {
            (String::new(), String::new(), "")
        };
        self.emit(format_args!("{grey}[{pink}>{grey}]:{reset} "));
    }

    fn boxed(&mut self, color: u8, text: &str) {
        let rule = self.paint(GREY, &RULE).to_string();
        let bar = self.paint(GREY, &" |").to_string();
        let end = self.paint(GREY, &"|").to_string();
        let text = format!("{text:<33}");
        let text = self.paint(color, &text).to_string();
        self.emit(format_args!("{rule}\n{bar}    {text}{end}\n{rule}\n\n"));
    }

    /// Prints the application banner.
    pub fn banner(&mut self) {
        let title = format!("AUDIOBANK RIPPER v{}", crate_version!());
        self.boxed(PINK, &title);
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_start(&mut self, rom: &Path) {
        let rom = format!("\"{}\"", rom.display());
        let rom = self.paint(BLUE, &rom).to_string();
        self.prompt();
        self.emit(format_args!("Reading ROM header:     {rom}\n"));
    }

    fn on_detected(&mut self, title: Title, order: ByteOrder) {
        let name = format!("\"{title}\"");
        let name = self.paint(title.profile().color, &name).to_string();
        self.prompt();
        self.emit(format_args!("Detected game:          {name} ({order})\n\n"));
    }

    fn on_extracting(&mut self, output_dir: &Path) {
        let dir = format!("\"{}\"", output_dir.display());
        let dir = self.paint(BLUE, &dir).to_string();
        self.prompt();
        self.emit(format_args!(
            "Extracting and writing banks and bankmeta to {dir}\n\n"
        ));
    }

    fn on_warning(&mut self, warning: &Warning) {
        let label = self.paint(YELLOW, &"Warning:").to_string();
        self.prompt();
        self.emit(format_args!("{label} {warning}\n\n"));
    }

    fn on_fatal(&mut self, error: &anyhow::Error) {
        self.prompt();
        self.emit(format_args!("Error: {error:#}\n\n"));
    }

    fn on_complete(&mut self, summary: &ExtractSummary) {
        self.prompt();
        self.emit(format_args!(
            "Wrote {} of {} banks\n\n",
            summary.written.len(),
            summary.parsed
        ));
        self.boxed(GREEN, "Process is now completed");
    }
}

struct Painted<'a> {
    color: Option<u8>,
    text: &'a dyn fmt::Display,
}

impl fmt::Display for Painted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "\x1b[38;5;{color}m{}{RESET}", self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(f: impl FnOnce(&mut ConsoleReporter<Vec<u8>>)) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        f(&mut reporter);
        String::from_utf8(reporter.into_inner()).expect("utf8")
    }

    #[test]
    fn test_plain_events() {
        assert_eq!(
            "[>]: Detected game:          \"Majora's Mask\" (Big Endian)\n\n",
            render(|r| r.on_detected(Title::MajorasMask, ByteOrder::BigEndian))
        );

        let warning = Warning::BankCountMismatch {
            title: Title::OcarinaOfTime,
            expected: 0x26,
            declared: 0x27,
        };
        assert_eq!(
            "[>]: Warning: The number of banks is 0x0027 instead of 0x26.\n\n",
            render(|r| r.on_warning(&warning))
        );

        let error = anyhow::Error::new(crate::error::Error::UnrecognizedHeader);
        assert_eq!(
            "[>]: Error: Decompressed ROM has an unexpected ROM header!\n\n",
            render(|r| r.on_fatal(&error))
        );
    }

    #[test]
    fn test_colored_title() {
        let mut reporter = ConsoleReporter::new(Vec::new(), true);
        reporter.on_detected(Title::OcarinaOfTime, ByteOrder::BigEndian);
        let out = String::from_utf8(reporter.into_inner()).expect("utf8");
        assert!(out.contains("\x1b[38;5;39m\"Ocarina of Time\"\x1b[0m"));
    }

    #[test]
    fn test_banner() {
        let out = render(|r| r.banner());
        assert!(out.starts_with(RULE));
        assert!(out.contains("AUDIOBANK RIPPER v"));
    }
}
