// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

//! Zelda 64 Audiobank Ripper
//!
//! This crate locates and extracts audiobanks from decompressed Nintendo 64 ROMs of
//! *The Legend of Zelda: Ocarina of Time* and *The Legend of Zelda: Majora's Mask*.
//!
//! # Overview
//!
//! Both games keep an index table of their audiobanks at a fixed offset in the ROM.
//! Every entry of that table names the location of one bank relative to the start of
//! the Audiobank region, its size, and eight bytes of bank metadata. Extraction writes
//! each selected bank as:
//!
//! - **`NN.zbank`**: the raw bank bytes
//! - **`NN.bankmeta`**: the eight metadata bytes from the index entry
//!
//! where `NN` is the bank index as two lowercase hex digits.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::fs::File;
//! use std::path::Path;
//! use zbank::extract::{self, Config, ExtractMode};
//! use zbank::report::SilentReporter;
//! use zbank::Title;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let mut rom = File::open("oot.z64")?;
//!     let config = Config::new(ExtractMode::ChangedOnly);
//!     let summary = extract::extract(
//!         &mut rom,
//!         Title::OcarinaOfTime,
//!         Path::new("oot_banks"),
//!         &config,
//!         &mut SilentReporter,
//!     )?;
//!     println!("wrote {} banks", summary.written.len());
//!     Ok(())
//! }
//! ```

use std::fmt;

use binrw::binrw;
use binrw::helpers::until_eof;
use binrw::io::Cursor;
use binrw::BinRead;

pub mod cli;
pub mod error;
pub mod extract;
pub mod report;
pub mod signature;

/// The exact size of a decompressed ROM in bytes (64 MiB).
pub const ROM_SIZE: u64 = 67_108_864;

/// The number of leading ROM bytes inspected for a [GameSignature].
pub const HEADER_LEN: usize = 64;

/// The size of the [IndexTableHeader] and of every [DirectoryEntry].
pub const ENTRY_LEN: usize = 0x10;

/// A supported game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Title {
    OcarinaOfTime,
    MajorasMask,
}

impl Title {
    pub const ALL: [Title; 2] = [Title::OcarinaOfTime, Title::MajorasMask];

    /// The static constants describing where this game keeps its audiobanks.
    pub fn profile(self) -> &'static TitleProfile {
        &PROFILES[self as usize]
    }

    /// Short key used to name output directories (`oot` or `mm`).
    pub fn key(self) -> &'static str {
        self.profile().key
    }

    /// Human-readable game name.
    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The byte ordering of a dumped N64 ROM.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Native ordering (`.z64`). The only ordering that can be extracted.
    BigEndian,
    /// Every 32-bit word reversed (`.n64`).
    LittleEndian,
    /// 16-bit halfwords swapped within each 32-bit word (`.v64`).
    Byteswapped,
}

impl ByteOrder {
    pub const ALL: [ByteOrder; 3] = [
        ByteOrder::BigEndian,
        ByteOrder::LittleEndian,
        ByteOrder::Byteswapped,
    ];
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ByteOrder::BigEndian => "Big Endian",
            ByteOrder::LittleEndian => "Little Endian",
            ByteOrder::Byteswapped => "Byteswapped",
        };
        write!(f, "{name}")
    }
}

/// A byte sequence found in the internal header of one game dumped with one
/// [ByteOrder].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSignature {
    pub order: ByteOrder,
    pub title: Title,
    pub magic: &'static [u8],
}

impl GameSignature {
    /// The game name shown when this signature is detected.
    pub fn label(&self) -> &'static str {
        self.title.name()
    }

    /// The 256-color ANSI palette index used to display [label](Self::label).
    pub fn color(&self) -> u8 {
        self.title.profile().color
    }
}

/// All recognized signatures, grouped by [ByteOrder] in declaration order and by
/// [Title] within each group. Detection reports the first match in this order.
pub static SIGNATURES: [GameSignature; 6] = [
    GameSignature {
        order: ByteOrder::BigEndian,
        title: Title::OcarinaOfTime,
        magic: b"THE LEGEND OF ZELDA \x00\x00\x00\x00\x00\x00\x00CZLE\x00",
    },
    GameSignature {
        order: ByteOrder::BigEndian,
        title: Title::MajorasMask,
        magic: b"ZELDA MAJORA'S MASK \x00\x00\x00\x00\x00\x00\x00NZSE\x00",
    },
    GameSignature {
        order: ByteOrder::LittleEndian,
        title: Title::OcarinaOfTime,
        magic: b"EHTEGELO DNEZ F ADL\x00\x00\x00\x00C\x00\x00\x00\x00ELZ",
    },
    GameSignature {
        order: ByteOrder::LittleEndian,
        title: Title::MajorasMask,
        magic: b"DLEZAM AAROJM S' KSA\x00\x00\x00\x00N\x00\x00\x00\x00ESZ",
    },
    GameSignature {
        order: ByteOrder::Byteswapped,
        title: Title::OcarinaOfTime,
        magic: b"HT EELEGDNO  FEZDL A\x00\x00\x00\x00\x00\x00C\x00L\x00E",
    },
    GameSignature {
        order: ByteOrder::Byteswapped,
        title: Title::MajorasMask,
        magic: b"EZDL AAMOJARS'M SA K\x00\x00\x00\x00\x00\x00N\x00SZ\x00E",
    },
];

/// Absolute ROM locations of the audiobank index table and the Audiobank region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudiobankLocation {
    /// Offset of the [IndexTable].
    pub index_offset: u32,
    /// Size of the [IndexTable] in bytes, header included.
    pub index_size: u32,
    /// Offset that every [DirectoryEntry::address] is relative to.
    pub bank_offset: u32,
    /// Size of the Audiobank region.
    pub bank_size: u32,
}

/// Everything needed to find, classify, and present the audiobanks of one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TitleProfile {
    pub title: Title,
    pub key: &'static str,
    pub name: &'static str,
    pub color: u8,
    pub location: AudiobankLocation,
    /// Bank count declared by an unmodified index table header.
    pub expected_bank_count: u16,
    /// Bank sizes of the original release, indexed by bank number.
    pub reference_sizes: &'static [u32],
}

/// Indexed by `Title as usize`.
static PROFILES: [TitleProfile; 2] = [
    TitleProfile {
        title: Title::OcarinaOfTime,
        key: "oot",
        name: "Ocarina of Time",
        color: 39,
        location: AudiobankLocation {
            index_offset: 0x00B8_96A0,
            index_size: 0x0000_0270,
            bank_offset: 0x0000_D390,
            bank_size: 0x0001_CA50,
        },
        expected_bank_count: 0x26,
        reference_sizes: &OOT_BANK_SIZES,
    },
    TitleProfile {
        title: Title::MajorasMask,
        key: "mm",
        name: "Majora's Mask",
        color: 141,
        location: AudiobankLocation {
            index_offset: 0x00C7_76C0,
            index_size: 0x0000_02A0,
            bank_offset: 0x0002_0700,
            bank_size: 0x0002_63F0,
        },
        expected_bank_count: 0x29,
        reference_sizes: &MM_BANK_SIZES,
    },
];

#[rustfmt::skip]
const OOT_BANK_SIZES: [u32; 38] = [
    0x3AA0, 0x17B0, 0x0CE0, 0x15D0, 0x0100,
    0x0B60, 0x0520, 0x0840, 0x0B20, 0x0FC0,
    0x09D0, 0x0390, 0x0320, 0x06F0, 0x0390,
    0x0B40, 0x09E0, 0x0560, 0x0CC0, 0x03A0,
    0x0AA0, 0x0A60, 0x0BF0, 0x01F0, 0x0860,
    0x05B0, 0x0250, 0x04E0, 0x04C0, 0x0C00,
    0x0270, 0x0640, 0x1300, 0x11A0, 0x1720,
    0x0DE0, 0x0660, 0x3940,
];

#[rustfmt::skip]
const MM_BANK_SIZES: [u32; 41] = [
    0x81C0, 0x36D0, 0x0CE0, 0x15D0, 0x0B60,
    0x0BE0, 0x0FC0, 0x06F0, 0x0560, 0x0CC0,
    0x0AA0, 0x0A60, 0x0BF0, 0x04C0, 0x0C00,
    0x0DE0, 0x0660, 0x14D0, 0x0C50, 0x1150,
    0x0520, 0x0770, 0x0500, 0x0940, 0x0840,
    0x1440, 0x0300, 0x0AE0, 0x06F0, 0x05B0,
    0x0810, 0x0520, 0x0FF0, 0x15E0, 0x00D0,
    0x14B0, 0x1410, 0x1540, 0x0390, 0x0520,
    0x03F0,
];

/// The first 16 bytes of an [IndexTable].
///
/// # Structure on Disk
///
/// | Offset | Type       | Description                               |
/// |--------|------------|-------------------------------------------|
/// | 0      | `u16`      | Number of banks listed in the table.      |
/// | 2      | `[u8; 14]` | Unused. Zero in the original releases.    |
#[binrw]
#[brw(big)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexTableHeader {
    count: u16,
    reserved: [u8; 14],
}

impl IndexTableHeader {
    pub fn new(count: u16) -> Self {
        Self {
            count,
            reserved: [0; 14],
        }
    }

    /// The bank count the table claims to hold.
    pub fn declared_count(&self) -> u16 {
        self.count
    }
}

/// An audiobank index table entry.
///
/// Entries are positional: the `n`th entry describes bank `n`.
///
/// # Structure on Disk
///
/// | Offset | Type      | Description                                          |
/// |--------|-----------|------------------------------------------------------|
/// | 0      | `u32`     | Bank address relative to the Audiobank region.       |
/// | 4      | `u32`     | Bank size in bytes.                                  |
/// | 8      | `[u8; 8]` | Bank metadata, copied verbatim into `.bankmeta`.      |
#[binrw]
#[brw(big)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    address: u32,
    size: u32,
    metadata: [u8; 8],
}

impl DirectoryEntry {
    pub fn new(address: u32, size: u32, metadata: [u8; 8]) -> Self {
        Self {
            address,
            size,
            metadata,
        }
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn metadata(&self) -> &[u8; 8] {
        &self.metadata
    }

    /// Absolute ROM offset of the bank data given the start of the Audiobank region.
    pub fn rom_offset(&self, location: &AudiobankLocation) -> u64 {
        u64::from(location.bank_offset) + u64::from(self.address)
    }
}

/// The audiobank index table: an [IndexTableHeader] followed by one
/// [DirectoryEntry] per 16 bytes up to the end of the table. A trailing fragment
/// shorter than an entry is ignored.
#[binrw]
#[brw(big)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexTable {
    header: IndexTableHeader,

    #[br(parse_with = until_eof)]
    entries: Vec<DirectoryEntry>,
}

impl IndexTable {
    pub fn new(header: IndexTableHeader, entries: Vec<DirectoryEntry>) -> Self {
        Self { header, entries }
    }

    /// Parses a raw index table blob.
    pub fn parse(bytes: &[u8]) -> error::Result<Self> {
        Ok(Self::read(&mut Cursor::new(bytes))?)
    }

    pub fn header(&self) -> &IndexTableHeader {
        &self.header
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }
}
