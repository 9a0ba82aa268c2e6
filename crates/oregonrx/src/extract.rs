//! Field extraction from validated payloads

use crate::family::{DecodeRule, FieldDescriptor, SensorFamily};
use crate::message::{DecodedMessage, FieldValue};

/// Channel firmware lookup table
///
/// The channel nibble is nominally one-hot: bit 0 for channel 1,
/// bit 1 for channel 2, and bit 2 for channel 3. Deployed sensor
/// firmware sends a raw `4` to mean channel 3, and the decoder
/// must report it the same way. Values without a known meaning
/// pass through unchanged.
pub const CHANNEL_MAP: [u8; 16] = [0, 1, 2, 3, 3, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// Logical channel for a raw channel nibble
///
/// ```
/// use oregonrx::channel_from_raw;
///
/// assert_eq!(1, channel_from_raw(1));
/// assert_eq!(2, channel_from_raw(2));
/// assert_eq!(3, channel_from_raw(4));
/// ```
pub fn channel_from_raw(raw: u8) -> u8 {
    CHANNEL_MAP[(raw & 0x0f) as usize]
}

/// Decode every field of `family` from a validated `payload`
///
/// `payload` starts at the first sensor ID nibble. The family
/// must be [well-formed](SensorFamily::is_well_formed) and the
/// payload must have the family's length.
pub(crate) fn extract(payload: &[u8], family: &SensorFamily) -> DecodedMessage {
    DecodedMessage::new(
        family.model(),
        family
            .fields()
            .iter()
            .map(|desc| FieldValue::new(desc.name, decode_field(payload, desc))),
    )
}

// Decode a single field
fn decode_field(payload: &[u8], desc: &FieldDescriptor) -> i32 {
    let nibbles = &payload[desc.span()];
    match desc.rule {
        DecodeRule::Hex => hex_msn_first(nibbles),
        DecodeRule::HexLsnFirst => hex_msn_first_iter(nibbles.iter().rev()),
        DecodeRule::Bcd => bcd_lsd_first(nibbles),
        DecodeRule::SignedBcd { sign_offset } => {
            let magnitude = bcd_lsd_first(nibbles);
            if payload[sign_offset] & 0x08 != 0 {
                -magnitude
            } else {
                magnitude
            }
        }
        DecodeRule::Channel => channel_from_raw(nibbles[0]) as i32,
        DecodeRule::Flag { mask } => (nibbles[0] & mask != 0) as i32,
    }
}

// Hexadecimal value, most-significant nibble first
fn hex_msn_first(nibbles: &[u8]) -> i32 {
    hex_msn_first_iter(nibbles.iter())
}

fn hex_msn_first_iter<'a, I>(nibbles: I) -> i32
where
    I: Iterator<Item = &'a u8>,
{
    nibbles.fold(0i32, |acc, &n| (acc << 4) | (n & 0x0f) as i32)
}

// Decimal value, least-significant digit first
//
// Digits are not checked. A corrupt digit above nine still
// contributes its face value.
fn bcd_lsd_first(nibbles: &[u8]) -> i32 {
    nibbles
        .iter()
        .rev()
        .fold(0i32, |acc, &n| acc * 10 + (n & 0x0f) as i32)
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
    fn test_channel_table() {
        assert_eq!(0, channel_from_raw(0));
        assert_eq!(1, channel_from_raw(1));
        assert_eq!(2, channel_from_raw(2));
        assert_eq!(3, channel_from_raw(4));

        // raw value is not the channel
        assert_ne!(4, channel_from_raw(4));
        assert_eq!(0, channel_from_raw(0x10));
    }

    #[test]
    fn test_numeric_helpers() {
        assert_eq!(0x1D20, hex_msn_first(&[0x1, 0xD, 0x2, 0x0]));
        assert_eq!(0x1FF, hex_msn_first_iter([0xF, 0xF, 0x1].iter().rev()));
        assert_eq!(190, bcd_lsd_first(&[0, 9, 1]));
        assert_eq!(17769, bcd_lsd_first(&[9, 6, 7, 7, 1, 0]));
        assert_eq!(0, bcd_lsd_first(&[]));
    }

    #[test]
    fn test_extract_temp_hygro() {
        let family = FamilyRegistry::oregon().lookup(0x1D20).unwrap();
        let msg = extract(&nibbles("1D20485C480882835"), family);
        assert_eq!("THGR122NX", msg.model());
        assert_eq!(Some(0x1D20), msg.field("SensorId"));
        assert_eq!(Some(3), msg.field("Channel"));
        assert_eq!(Some(0x85), msg.field("Id"));
        assert_eq!(Some(1), msg.field("LowBattery"));
        assert_eq!(Some(-84), msg.field("Temp"));
        assert_eq!(Some(28), msg.field("Moisture"));
    }

    #[test]
    fn test_extract_pressure() {
        let family = FamilyRegistry::oregon().lookup(0x5D60).unwrap();
        let msg = extract(&nibbles("5D6016B109107300FF1E5"), family);
        let names: Vec<&str> = msg.iter().map(|f| f.name()).collect();
        assert_eq!(
            vec!["SensorId", "Channel", "Id", "LowBattery", "Temp", "Moisture", "Pressure"],
            names
        );
        assert_eq!(Some(511), msg.field("Pressure"));
    }

    #[test]
    fn test_extract_wind() {
        let family = FamilyRegistry::oregon().lookup(0x1984).unwrap();
        let msg = extract(&nibbles("198416B1800063892D4"), family);
        assert_eq!(Some(8), msg.field("Direction"));
        assert_eq!(Some(360), msg.field("Wind"));
        assert_eq!(Some(298), msg.field("AverageWind"));
    }
}
