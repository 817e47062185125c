// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC compressed GlobalId expansion.
//!
//! A GlobalId packs a 128-bit UUID into 22 characters over a 64-symbol
//! alphabet. The first two characters carry the leading byte and each of
//! the following five groups of four characters carries three bytes.

use uuid::Uuid;

use crate::error::{Error, Result};

/// Length of a compressed GlobalId.
pub const GLOBAL_ID_LEN: usize = 22;

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

fn symbol_value(c: u8) -> Option<u32> {
    ALPHABET.iter().position(|&a| a == c).map(|v| v as u32)
}

fn decode_group(id: &str, group: &[u8]) -> Result<u32> {
    group.iter().try_fold(0u32, |acc, &c| {
        symbol_value(c)
            .map(|v| acc * 64 + v)
            .ok_or_else(|| Error::InvalidGlobalId {
                id: id.to_string(),
                reason: "character outside the GlobalId alphabet",
            })
    })
}

/// Expands a compressed GlobalId into its UUID.
pub fn expand_global_id(id: &str) -> Result<Uuid> {
    let raw = id.as_bytes();
    if raw.len() != GLOBAL_ID_LEN {
        return Err(Error::InvalidGlobalId {
            id: id.to_string(),
            reason: "expected 22 characters",
        });
    }

    let mut bytes = [0u8; 16];
    let head = decode_group(id, &raw[..2])?;
    if head > 0xff {
        return Err(Error::InvalidGlobalId {
            id: id.to_string(),
            reason: "leading group exceeds one byte",
        });
    }
    bytes[0] = head as u8;

    for (i, group) in raw[2..].chunks(4).enumerate() {
        let value = decode_group(id, group)?;
        let at = 1 + i * 3;
        bytes[at] = (value >> 16) as u8;
        bytes[at + 1] = (value >> 8) as u8;
        bytes[at + 2] = value as u8;
    }

    Ok(Uuid::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_id_is_nil() {
        assert_eq!(expand_global_id("0000000000000000000000").unwrap(), Uuid::nil());
    }

    #[test]
    fn max_id_is_all_ones() {
        let uuid = expand_global_id("3$$$$$$$$$$$$$$$$$$$$$").unwrap();
        assert_eq!(uuid.as_bytes(), &[0xff; 16]);
    }

    #[test]
    fn known_id() {
        // 0..=15 as bytes, compressed
        let uuid = expand_global_id("000G8310K61mW92WiC3GuF").unwrap();
        assert_eq!(
            uuid.to_string(),
            "00010203-0405-0607-0809-0a0b0c0d0e0f"
        );
    }

    #[test]
    fn rejects_malformed() {
        assert!(matches!(
            expand_global_id("short"),
            Err(Error::InvalidGlobalId { .. })
        ));
        assert!(matches!(
            expand_global_id("4000000000000000000000"),
            Err(Error::InvalidGlobalId { .. })
        ));
        assert!(matches!(
            expand_global_id("00000000000000000000-0"),
            Err(Error::InvalidGlobalId { .. })
        ));
    }
}
