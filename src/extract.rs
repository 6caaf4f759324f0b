// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

//! Reads the audiobank index table of a ROM and writes the selected banks.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use super::error::{Result, Warning};
use super::report::Reporter;
use super::{DirectoryEntry, IndexTable, Title, TitleProfile};

/// Which banks to write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExtractMode {
    /// Banks whose size matches the original release
    #[value(name = "vanilla")]
    VanillaOnly,
    /// Banks whose size differs from the original release
    #[default]
    #[value(name = "changed")]
    ChangedOnly,
}

impl ExtractMode {
    /// Whether a bank with the given status is written in this mode.
    pub fn selects(self, status: BankStatus) -> bool {
        matches!(
            (self, status),
            (ExtractMode::VanillaOnly, BankStatus::Vanilla)
                | (ExtractMode::ChangedOnly, BankStatus::Modified)
        )
    }
}

/// Extraction settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub mode: ExtractMode,
}

impl Config {
    pub fn new(mode: ExtractMode) -> Self {
        Self { mode }
    }
}

/// Whether a bank still has the size it had in the original release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankStatus {
    Vanilla,
    Modified,
}

impl BankStatus {
    /// Compares `size` against the reference size for bank `index`. Banks past
    /// the end of the reference table are never vanilla.
    pub fn classify(reference_sizes: &[u32], index: usize, size: u32) -> Self {
        match reference_sizes.get(index) {
            Some(&reference) if reference == size => BankStatus::Vanilla,
            _ => BankStatus::Modified,
        }
    }
}

impl fmt::Display for BankStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BankStatus::Vanilla => f.pad("vanilla"),
            BankStatus::Modified => f.pad("modified"),
        }
    }
}

/// The result of a completed extraction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Number of entries read from the index table.
    pub parsed: usize,
    /// Indices of the banks that were written, in table order.
    pub written: Vec<usize>,
}

/// The file name stem for bank `index`: two or more lowercase hex digits.
pub fn bank_stem(index: usize) -> String {
    format!("{index:02x}")
}

/// Reads and parses the index table described by `profile`.
pub fn read_index_table<R: Read + Seek>(rom: &mut R, profile: &TitleProfile) -> Result<IndexTable> {
    let location = &profile.location;
    rom.seek(SeekFrom::Start(u64::from(location.index_offset)))?;
    let mut bytes = vec![0u8; location.index_size as usize];
    rom.read_exact(&mut bytes)?;
    IndexTable::parse(&bytes)
}

/// Reads the index table and reports a [Warning::BankCountMismatch] when its
/// header disagrees with the original release.
pub fn read_checked_index_table<R: Read + Seek>(
    rom: &mut R,
    profile: &TitleProfile,
    reporter: &mut dyn Reporter,
) -> Result<IndexTable> {
    let table = read_index_table(rom, profile)?;
    let declared = table.header().declared_count();
    if declared != profile.expected_bank_count {
        reporter.on_warning(&Warning::BankCountMismatch {
            title: profile.title,
            expected: profile.expected_bank_count,
            declared,
        });
    }
    Ok(table)
}

/// Extracts the banks of `title` selected by `config` into `output_dir`.
pub fn extract<R: Read + Seek>(
    rom: &mut R,
    title: Title,
    output_dir: &Path,
    config: &Config,
    reporter: &mut dyn Reporter,
) -> Result<ExtractSummary> {
    extract_with_profile(rom, title.profile(), output_dir, config, reporter)
}

/// Extracts banks using explicit table locations and reference sizes.
///
/// `output_dir` is created only when at least one bank is selected. Files that
/// already exist are overwritten. An error stops extraction but leaves banks
/// written before it in place.
pub fn extract_with_profile<R: Read + Seek>(
    rom: &mut R,
    profile: &TitleProfile,
    output_dir: &Path,
    config: &Config,
    reporter: &mut dyn Reporter,
) -> Result<ExtractSummary> {
    let table = read_checked_index_table(rom, profile, reporter)?;

    let mut summary = ExtractSummary {
        parsed: table.entries().len(),
        written: Vec::new(),
    };

    for (index, entry) in table.entries().iter().enumerate() {
        let status = BankStatus::classify(profile.reference_sizes, index, entry.size());
        reporter.on_bank(index, entry, status);
        log::debug!(
            "bank {}: {status} 0x{:x} bytes at 0x{:08x}",
            bank_stem(index),
            entry.size(),
            entry.address()
        );

        if !config.mode.selects(status) {
            continue;
        }

        let region_size = profile.location.bank_size;
        if u64::from(entry.address()) + u64::from(entry.size()) > u64::from(region_size) {
            reporter.on_warning(&Warning::OutsideBankRegion {
                index,
                address: entry.address(),
                size: entry.size(),
                region_size,
            });
        }

        write_bank(rom, profile, output_dir, index, entry)?;
        summary.written.push(index);
    }

    log::info!(
        "wrote {} of {} banks to {}",
        summary.written.len(),
        summary.parsed,
        output_dir.display()
    );
    Ok(summary)
}

/// Paths of the `.zbank` and `.bankmeta` files for bank `index`.
pub fn bank_paths(output_dir: &Path, index: usize) -> (PathBuf, PathBuf) {
    let stem = bank_stem(index);
    (
        output_dir.join(format!("{stem}.zbank")),
        output_dir.join(format!("{stem}.bankmeta")),
    )
}

fn write_bank<R: Read + Seek>(
    rom: &mut R,
    profile: &TitleProfile,
    output_dir: &Path,
    index: usize,
    entry: &DirectoryEntry,
) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let (zbank_path, meta_path) = bank_paths(output_dir, index);

    rom.seek(SeekFrom::Start(entry.rom_offset(&profile.location)))?;
    let mut zbank = File::create(&zbank_path)?;
    let copied = io::copy(&mut rom.by_ref().take(u64::from(entry.size())), &mut zbank)?;
    if copied != u64::from(entry.size()) {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "bank {} ends past the end of the ROM ({copied} of {} bytes read)",
                bank_stem(index),
                entry.size()
            ),
        )
        .into());
    }

    fs::write(&meta_path, entry.metadata())?;
    Ok(())
}
