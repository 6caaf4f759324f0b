// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

#![allow(dead_code)]

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::Result;
use binrw::io::Cursor;
use binrw::BinWrite;

use zbank::error::Warning;
use zbank::report::Reporter;
use zbank::{DirectoryEntry, IndexTable, IndexTableHeader, TitleProfile, ENTRY_LEN, ROM_SIZE};

/// A bank to place in a synthetic ROM.
pub struct Bank {
    pub payload: Vec<u8>,
    pub metadata: [u8; 8],
}

impl Bank {
    /// A bank of `size` bytes filled with a pattern derived from `seed`.
    pub fn patterned(seed: u8, size: usize) -> Self {
        Self {
            payload: (0..size).map(|i| seed.wrapping_add(i as u8)).collect(),
            metadata: [seed, 1, 2, 3, 4, 5, 6, seed ^ 0xff],
        }
    }
}

/// Lays out banks back to back in the Audiobank region and builds the index
/// table describing them. Unused table slots stay zeroed.
pub struct SyntheticRom {
    profile: TitleProfile,
    declared_count: u16,
    banks: Vec<Bank>,
}

impl SyntheticRom {
    pub fn new(profile: &TitleProfile) -> Self {
        Self {
            profile: *profile,
            declared_count: profile.expected_bank_count,
            banks: Vec::new(),
        }
    }

    pub fn declared_count(mut self, count: u16) -> Self {
        self.declared_count = count;
        self
    }

    pub fn bank(mut self, bank: Bank) -> Self {
        self.banks.push(bank);
        self
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn slots(&self) -> usize {
        (self.profile.location.index_size as usize - ENTRY_LEN) / ENTRY_LEN
    }

    pub fn table(&self) -> IndexTable {
        let mut address = 0u32;
        let mut entries = Vec::new();
        for bank in &self.banks {
            let size = bank.payload.len() as u32;
            entries.push(DirectoryEntry::new(address, size, bank.metadata));
            address += size;
        }
        entries.resize(self.slots(), DirectoryEntry::new(0, 0, [0; 8]));
        IndexTable::new(IndexTableHeader::new(self.declared_count), entries)
    }

    fn table_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.table().write(&mut bytes)?;
        Ok(bytes.into_inner())
    }

    /// The smallest in-memory image holding the table and every bank.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut rom = Cursor::new(Vec::new());
        self.write_to(&mut rom)?;
        Ok(rom.into_inner())
    }

    /// A full-size ROM file whose header carries `magic`.
    pub fn write_file(&self, path: &Path, magic: &[u8]) -> Result<()> {
        let mut file = File::create(path)?;
        file.set_len(ROM_SIZE)?;
        file.write_all(magic)?;
        self.write_to(&mut file)?;
        Ok(())
    }

    fn write_to<W: Write + Seek>(&self, rom: &mut W) -> Result<()> {
        let location = &self.profile.location;
        rom.seek(SeekFrom::Start(u64::from(location.bank_offset)))?;
        for bank in &self.banks {
            rom.write_all(&bank.payload)?;
        }
        rom.seek(SeekFrom::Start(u64::from(location.index_offset)))?;
        rom.write_all(&self.table_bytes()?)?;
        Ok(())
    }
}

/// Records warnings for inspection.
#[derive(Default)]
pub struct RecordingReporter {
    pub warnings: Vec<Warning>,
    pub banks: Vec<usize>,
}

impl Reporter for RecordingReporter {
    fn on_bank(
        &mut self,
        index: usize,
        _entry: &DirectoryEntry,
        _status: zbank::extract::BankStatus,
    ) {
        self.banks.push(index);
    }

    fn on_warning(&mut self, warning: &Warning) {
        self.warnings.push(warning.clone());
    }
}
