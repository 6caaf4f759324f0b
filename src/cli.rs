// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use super::error::Error;
use super::extract::{self, BankStatus, Config, ExtractSummary};
use super::report::{Reporter, SilentReporter};
use super::signature;
use super::{Title, HEADER_LEN, ROM_SIZE};

/// Fails with [Error::WrongSize] unless the ROM is exactly [ROM_SIZE] bytes.
pub fn check_size(rom_path: &Path) -> Result<()> {
    let actual = fs::metadata(rom_path)
        .with_context(|| format!("could not read {}", rom_path.display()))?
        .len();
    if actual != ROM_SIZE {
        return Err(Error::WrongSize {
            expected: ROM_SIZE,
            actual,
        }
        .into());
    }
    Ok(())
}

/// Reads the first [HEADER_LEN] bytes of the ROM.
pub fn read_header(rom_path: &Path) -> Result<[u8; HEADER_LEN]> {
    let mut file = File::open(rom_path)
        .with_context(|| format!("could not open {}", rom_path.display()))?;
    let mut header = [0u8; HEADER_LEN];
    file.read_exact(&mut header)?;
    Ok(header)
}

/// Validates the ROM size and header and returns the detected [Title].
///
/// A recognized game is reported even when its byte order prevents ripping.
pub fn identify(rom_path: &Path, reporter: &mut dyn Reporter) -> Result<Title> {
    check_size(rom_path)?;
    reporter.on_start(rom_path);

    let header = read_header(rom_path)?;
    match signature::detect(&header) {
        Ok((title, order)) => {
            reporter.on_detected(title, order);
            Ok(title)
        }
        Err(e) => {
            if let Error::UnsupportedByteOrder { title, order } = &e {
                reporter.on_detected(*title, *order);
            }
            Err(e.into())
        }
    }
}

/// The default output directory name: `<game key>_<YYYY-MM-DD_HHMM>`.
pub fn default_output_dir(title: Title, now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("{}_{}", title.key(), now.format("%Y-%m-%d_%H%M")))
}

/// Identifies the ROM and extracts its banks.
///
/// Banks are written to `output_dir` or, if `None`, to a timestamped directory
/// named by [default_output_dir] in the current directory.
pub fn rip(
    rom_path: &Path,
    output_dir: Option<PathBuf>,
    config: &Config,
    reporter: &mut dyn Reporter,
) -> Result<ExtractSummary> {
    let title = identify(rom_path, reporter)?;
    let output_dir = output_dir.unwrap_or_else(|| default_output_dir(title, Local::now()));

    let mut rom = File::open(rom_path)
        .with_context(|| format!("could not open {}", rom_path.display()))?;
    reporter.on_extracting(&output_dir);
    let summary = extract::extract(&mut rom, title, &output_dir, config, reporter)?;
    reporter.on_complete(&summary);
    Ok(summary)
}

/// Prints every index table entry of the ROM with its classification.
pub fn list(write: &mut impl Write, rom_path: &Path) -> Result<()> {
    let title = identify(rom_path, &mut SilentReporter)?;
    let profile = title.profile();

    let mut rom = File::open(rom_path)
        .with_context(|| format!("could not open {}", rom_path.display()))?;
    let table = extract::read_index_table(&mut rom, profile)?;

    writeln!(
        write,
        "{} audiobank table: 0x{:04x} banks declared, {} entries",
        title,
        table.header().declared_count(),
        table.entries().len()
    )?;
    writeln!(write)?;
    writeln!(write, "Bank Address  Size     Vanilla  Status   Metadata")?;
    for (index, entry) in table.entries().iter().enumerate() {
        let reference = profile
            .reference_sizes
            .get(index)
            .map(|size| format!("0x{size:04x}"))
            .unwrap_or_else(|| "-".to_string());
        let status = BankStatus::classify(profile.reference_sizes, index, entry.size());
        let metadata: String = entry
            .metadata()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        writeln!(
            write,
            "{:<4} {:08x} 0x{:06x} {:<8} {:<8} {}",
            extract::bank_stem(index),
            entry.address(),
            entry.size(),
            reference,
            status,
            metadata
        )?;
    }
    Ok(())
}
