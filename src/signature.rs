// SPDX-FileCopyrightText: © 2025 TTKB, LLC
// SPDX-License-Identifier: BSD-3-CLAUSE

//! Identifies the game and byte order of a ROM from its header.

use super::error::{Error, Result};
use super::{ByteOrder, GameSignature, Title, SIGNATURES};

/// Returns the first [GameSignature] whose magic appears anywhere in `header`.
pub fn identify(header: &[u8]) -> Option<&'static GameSignature> {
    SIGNATURES
        .iter()
        .find(|signature| contains(header, signature.magic))
}

/// Identifies the game in a ROM header.
///
/// Only [ByteOrder::BigEndian] ROMs can be ripped. A recognized game in any
/// other byte order fails with [Error::UnsupportedByteOrder], which still
/// carries the [Title] for display.
pub fn detect(header: &[u8]) -> Result<(Title, ByteOrder)> {
    let signature = identify(header).ok_or(Error::UnrecognizedHeader)?;
    match signature.order {
        ByteOrder::BigEndian => Ok((signature.title, signature.order)),
        order => Err(Error::UnsupportedByteOrder {
            title: signature.title,
            order,
        }),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && haystack
            .windows(needle.len())
            .any(|window| window == needle)
}
