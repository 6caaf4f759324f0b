// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use zbank::cli;
use zbank::extract::{Config, ExtractMode};
use zbank::report::{ConsoleReporter, Reporter};

/// Extract audiobanks from decompressed Ocarina of Time and Majora's Mask ROMs.
#[derive(Debug, Parser)]
#[clap(name = env!("CARGO_CRATE_NAME"), version)]
#[command(version, about, long_about = None)]
pub struct App {
    /// a decompressed, big-endian ROM
    #[arg(required = false)]
    rom: Option<PathBuf>,

    /// which banks to extract
    #[arg(long, value_enum, default_value_t = ExtractMode::ChangedOnly)]
    mode: ExtractMode,

    /// the directory to write banks to (default: <game>_<date>_<time>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// log more detail (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Option<CLICommand>,
}

#[derive(Debug, Subcommand)]
enum CLICommand {
    /// Extract audiobanks and bank metadata
    Rip {
        /// a decompressed, big-endian ROM
        #[arg(required = true)]
        rom: PathBuf,

        /// which banks to extract
        #[arg(long, value_enum, default_value_t = ExtractMode::ChangedOnly)]
        mode: ExtractMode,

        /// the directory to write banks to (default: <game>_<date>_<time>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the audiobank index table of a ROM
    List {
        /// a decompressed, big-endian ROM
        #[arg(required = true)]
        rom: PathBuf,
    },
}

fn run(args: App, reporter: &mut ConsoleReporter<std::io::Stdout>) -> Result<()> {
    match args.command {
        Some(command) => match command {
            CLICommand::Rip { rom, mode, output } => {
                reporter.banner();
                cli::rip(&rom, output, &Config::new(mode), reporter)?;
            }
            CLICommand::List { rom } => cli::list(&mut std::io::stdout(), &rom)?,
        },
        None => match args.rom {
            Some(rom) => {
                reporter.banner();
                cli::rip(&rom, args.output, &Config::new(args.mode), reporter)?;
            }
            None => {
                let a = App::command().render_help();
                eprintln!("{}", a);
            }
        },
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = App::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let color = if args.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    if let Err(e) = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        color,
    ) {
        eprintln!("could not initialize logging: {e}");
    }

    let mut reporter = ConsoleReporter::stdout(!args.no_color);
    match run(args, &mut reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reporter.on_fatal(&e);
            ExitCode::FAILURE
        }
    }
}
