// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

use std::fmt;

use thiserror::Error;

use super::{ByteOrder, Title};

pub type Result<T> = std::result::Result<T, Error>;

/// Conditions that stop ripping.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ROM file is not decompressed! Expected {expected} bytes but found {actual}")]
    WrongSize { expected: u64, actual: u64 },

    #[error("Decompressed ROM has an unexpected ROM header!")]
    UnrecognizedHeader,

    #[error("{title} ROM file byte order is \"{order}\", use tool64 to change the byte order to \"Big Endian\"!")]
    UnsupportedByteOrder { title: Title, order: ByteOrder },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Malformed audiobank index table: {0}")]
    Parse(#[from] binrw::Error),
}

/// Conditions reported while ripping that do not stop it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// The index table header declares a different number of banks than the
    /// original release.
    BankCountMismatch {
        title: Title,
        expected: u16,
        declared: u16,
    },

    /// An entry reaches past the end of the Audiobank region.
    OutsideBankRegion {
        index: usize,
        address: u32,
        size: u32,
        region_size: u32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::BankCountMismatch {
                title: _,
                expected,
                declared,
            } => write!(
                f,
                "The number of banks is 0x{declared:04x} instead of 0x{expected:02x}."
            ),
            Warning::OutsideBankRegion {
                index,
                address,
                size,
                region_size,
            } => write!(
                f,
                "Bank 0x{index:02x} at 0x{address:08x} (0x{size:x} bytes) extends past the \
                 Audiobank region (0x{region_size:x} bytes)."
            ),
        }
    }
}
