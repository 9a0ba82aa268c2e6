//! Telegram checksums

#[cfg(not(test))]
use log::debug;

#[cfg(test)]
use std::println as debug;

use crate::family::SensorFamily;

/// Checksum algorithm used by a sensor family
///
/// Each [`SensorFamily`] names its own algorithm. Sensor hardware
/// generations do not all agree on checksum conventions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ChecksumKind {
    /// Eight-bit sum of nibbles
    ///
    /// Every payload nibble ahead of the checksum field is added,
    /// modulo 256. The checksum field is two nibbles wide and is
    /// transmitted least-significant nibble first.
    NibbleSum,
}

impl ChecksumKind {
    /// Compute the checksum over `data`
    ///
    /// `data` is the payload up to, but not including, the
    /// checksum field.
    pub fn compute(&self, data: &[u8]) -> u8 {
        match self {
            ChecksumKind::NibbleSum => data
                .iter()
                .fold(0u8, |acc, &nibble| acc.wrapping_add(nibble & 0x0f)),
        }
    }

    /// Read the transmitted checksum from its field
    pub fn transmitted(&self, field: &[u8]) -> Option<u8> {
        match (self, field) {
            (ChecksumKind::NibbleSum, &[lo, hi, ..]) => Some((hi & 0x0f) << 4 | (lo & 0x0f)),
            _ => None,
        }
    }
}

/// Validate a complete payload against its family's checksum
///
/// `payload` holds every nibble after the preamble. Returns
/// `false` if the payload has the wrong length or if the
/// checksum does not match.
pub(crate) fn validate(payload: &[u8], family: &SensorFamily) -> bool {
    if payload.len() != family.payload_nibbles() {
        return false;
    }

    let (data, field) = payload.split_at(family.checksum_offset());
    let kind = family.checksum();
    let expected = kind.compute(data);
    match kind.transmitted(field) {
        Some(transmitted) if transmitted == expected => true,
        Some(transmitted) => {
            debug!(
                "checksum: {} mismatch: expected {:02X}, received {:02X}",
                family.model(),
                expected,
                transmitted
            );
            false
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::family::FamilyRegistry;

    fn nibbles(hex: &str) -> Vec<u8> {
        hex.chars()
            .map(|c| c.to_digit(16).expect("hex digit") as u8)
            .collect()
    }

    #[test]
    fn test_nibble_sum() {
        let kind = ChecksumKind::NibbleSum;
        assert_eq!(0, kind.compute(&[]));
        assert_eq!(0x41, kind.compute(&nibbles("1D2016B1091073A")));

        // wraps at eight bits
        assert_eq!(0x0e, kind.compute(&[0xf; 18]));
    }

    #[test]
    fn test_transmitted_low_nibble_first() {
        let kind = ChecksumKind::NibbleSum;
        assert_eq!(Some(0x41), kind.transmitted(&[0x1, 0x4]));
        assert_eq!(Some(0x5e), kind.transmitted(&[0xe, 0x5]));
        assert_eq!(None, kind.transmitted(&[0x1]));
    }

    #[test]
    fn test_validate() {
        let registry = FamilyRegistry::oregon();
        let thgr = registry.lookup(0x1D20).unwrap();
        let payload = nibbles("1D2016B1091073A14");
        assert!(validate(&payload, thgr));

        // wrong family length
        let thn = registry.lookup(0xEC40).unwrap();
        assert!(!validate(&payload, thn));
        assert!(!validate(&payload[0..16], thgr));

        // any corrupted checksum nibble fails
        for pos in 15..17 {
            for bad in 0..16u8 {
                let mut corrupt = payload.clone();
                if corrupt[pos] == bad {
                    continue;
                }
                corrupt[pos] = bad;
                assert!(!validate(&corrupt, thgr));
            }
        }

        // and so does corrupted data
        let mut corrupt = payload.clone();
        corrupt[9] = 0x8;
        assert!(!validate(&corrupt, thgr));
    }
}
