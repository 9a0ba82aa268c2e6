//! Sensor families and the registry of known sensor IDs

use std::fmt;
use std::ops::Range;

use lazy_static::lazy_static;
use strum::EnumMessage;

#[cfg(not(test))]
use log::warn;

#[cfg(test)]
use std::println as warn;

use crate::checksum::ChecksumKind;
use crate::families;
use crate::message::MAX_FIELDS;

/// Nibble which begins every Oregon Scientific telegram
pub const PREAMBLE: u8 = 0xA;

/// Number of sensor ID nibbles which follow the preamble
pub const SENSOR_ID_NIBBLES: usize = 4;

/// Width of the trailing checksum field, in nibbles
pub const CHECKSUM_NIBBLES: usize = 2;

/// Longest frame the decoder can buffer, in nibbles
///
/// Includes the preamble. Families with longer frames are
/// never matched.
pub const MAX_FRAME_NIBBLES: usize = 32;

// widest field which still fits an i32, in nibbles
const MAX_FIELD_WIDTH: usize = 7;

/// Broad category of an Oregon Scientific sensor
///
/// ```
/// use oregonrx::SensorKind;
///
/// assert_eq!("wind", SensorKind::Wind.as_str());
/// assert_eq!("Wind speed and direction", SensorKind::Wind.as_display_str());
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::EnumMessage, strum_macros::EnumString,
)]
pub enum SensorKind {
    /// Thermometer
    #[strum(serialize = "temp", detailed_message = "Temperature")]
    Temperature,

    /// Thermometer and hygrometer
    #[strum(serialize = "temp-hygro", detailed_message = "Temperature and humidity")]
    TemperatureHumidity,

    /// Thermometer, hygrometer, and barometer
    #[strum(
        serialize = "temp-hygro-baro",
        detailed_message = "Temperature, humidity, and barometric pressure"
    )]
    TemperatureHumidityPressure,

    /// Anemometer with wind vane
    #[strum(serialize = "wind", detailed_message = "Wind speed and direction")]
    Wind,

    /// Rain gauge
    #[strum(serialize = "rain", detailed_message = "Rain rate and total rainfall")]
    Rain,
}

impl SensorKind {
    /// Human-readable string representation
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }

    /// Short machine-friendly name
    pub fn as_str(&self) -> &'static str {
        self.get_serializations()[0]
    }
}

impl AsRef<str> for SensorKind {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_display_str().fmt(f)
    }
}

/// Oregon Scientific RF protocol revision
///
/// Both revisions share the nibble layout conventions used
/// here. They differ in the radio layer, which is not our
/// concern, and in which checksum conventions newer hardware
/// may add.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolRevision {
    /// Protocol version 2.1
    V2,

    /// Protocol version 3.0
    V3,
}

impl fmt::Display for ProtocolRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolRevision::V2 => "v2.1".fmt(f),
            ProtocolRevision::V3 => "v3.0".fmt(f),
        }
    }
}

/// How to turn a run of nibbles into an integer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecodeRule {
    /// Hexadecimal, most-significant nibble first
    Hex,

    /// Hexadecimal, least-significant nibble first
    HexLsnFirst,

    /// Decimal digits, least-significant digit first
    Bcd,

    /// Decimal digits, least-significant digit first, negated
    /// when bit 3 of the nibble at `sign_offset` is set
    SignedBcd {
        /// Payload offset of the sign nibble
        sign_offset: usize,
    },

    /// Channel number, mapped through the firmware lookup table
    Channel,

    /// A single bit, reported as `0` or `1`
    Flag {
        /// Bit within the nibble
        mask: u8,
    },
}

/// One named field within a sensor's payload
///
/// Offsets count from the first sensor ID nibble. The
/// preamble is not counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Field name, as reported to consumers
    pub name: &'static str,

    /// Offset of the first nibble
    pub offset: usize,

    /// Number of nibbles
    pub width: usize,

    /// Decoding rule
    pub rule: DecodeRule,
}

impl FieldDescriptor {
    /// New field descriptor
    pub const fn new(name: &'static str, offset: usize, width: usize, rule: DecodeRule) -> Self {
        Self {
            name,
            offset,
            width,
            rule,
        }
    }

    /// Payload nibbles occupied by this field
    ///
    /// Does not include a separate sign nibble.
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.width
    }

    // every nibble this field reads lies before `limit`
    fn fits_within(&self, limit: usize) -> bool {
        let sign_ok = match self.rule {
            DecodeRule::SignedBcd { sign_offset } => sign_offset < limit,
            _ => true,
        };
        self.width > 0 && self.width <= MAX_FIELD_WIDTH && self.span().end <= limit && sign_ok
    }
}

/// Wire layout shared by one or more sensor IDs
///
/// A `SensorFamily` describes the *payload* of a telegram: every
/// nibble after the preamble, starting with the four sensor ID
/// nibbles and ending with the checksum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SensorFamily {
    model: &'static str,
    kind: SensorKind,
    revision: ProtocolRevision,
    payload_nibbles: usize,
    checksum: ChecksumKind,
    fields: &'static [FieldDescriptor],
}

impl SensorFamily {
    /// New sensor family
    ///
    /// `payload_nibbles` counts everything after the preamble,
    /// including the trailing checksum.
    pub const fn new(
        model: &'static str,
        kind: SensorKind,
        revision: ProtocolRevision,
        payload_nibbles: usize,
        checksum: ChecksumKind,
        fields: &'static [FieldDescriptor],
    ) -> Self {
        Self {
            model,
            kind,
            revision,
            payload_nibbles,
            checksum,
            fields,
        }
    }

    /// Representative model name, like "`THGR122NX`"
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Sensor category
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Protocol revision
    pub fn revision(&self) -> ProtocolRevision {
        self.revision
    }

    /// Payload length, in nibbles
    pub fn payload_nibbles(&self) -> usize {
        self.payload_nibbles
    }

    /// Frame length, in nibbles, including the preamble
    pub fn frame_nibbles(&self) -> usize {
        self.payload_nibbles + 1
    }

    /// Payload offset of the checksum field
    pub fn checksum_offset(&self) -> usize {
        self.payload_nibbles.saturating_sub(CHECKSUM_NIBBLES)
    }

    /// Checksum algorithm
    pub fn checksum(&self) -> ChecksumKind {
        self.checksum
    }

    /// Fields, in the order they are reported
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// True if the layout can be decoded
    ///
    /// The frame must fit in [`MAX_FRAME_NIBBLES`], hold at least
    /// a sensor ID and a checksum, and every field must lie
    /// before the checksum.
    pub fn is_well_formed(&self) -> bool {
        self.frame_nibbles() <= MAX_FRAME_NIBBLES
            && self.payload_nibbles >= SENSOR_ID_NIBBLES + CHECKSUM_NIBBLES
            && self.fields.len() <= MAX_FIELDS
            && self
                .fields
                .iter()
                .all(|f| f.fits_within(self.checksum_offset()))
    }
}

impl fmt::Display for SensorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {} nibbles)",
            self.model, self.kind, self.revision, self.payload_nibbles
        )
    }
}

/// Static table of sensor families, keyed by sensor ID
pub type FamilyMap = phf::Map<u16, &'static SensorFamily>;

/// Maps sensor IDs to their wire layouts
///
/// The registry is immutable. Decoders share it by reference.
/// The built-in table of Oregon Scientific sensors is available
/// from [`FamilyRegistry::oregon()`].
///
/// ```
/// use oregonrx::FamilyRegistry;
///
/// let registry = FamilyRegistry::oregon();
/// let family = registry.lookup(0x1D20).expect("known sensor");
/// assert_eq!("THGR122NX", family.model());
/// assert_eq!(17, family.payload_nibbles());
///
/// assert!(registry.lookup(0x0000).is_none());
/// ```
#[derive(Debug)]
pub struct FamilyRegistry {
    families: &'static FamilyMap,
    max_frame_nibbles: usize,
}

impl FamilyRegistry {
    /// Registry over a static table of families
    ///
    /// Families which are not
    /// [well-formed](SensorFamily::is_well_formed) are reported
    /// and will never match.
    pub fn new(families: &'static FamilyMap) -> Self {
        let mut max_frame_nibbles = SENSOR_ID_NIBBLES + 1;
        for (id, family) in families.entries() {
            if family.is_well_formed() {
                max_frame_nibbles = usize::max(max_frame_nibbles, family.frame_nibbles());
            } else {
                warn!(
                    "registry: family {:04X} {} is malformed and will be ignored",
                    id, family
                );
            }
        }

        Self {
            families,
            max_frame_nibbles,
        }
    }

    /// The built-in Oregon Scientific family table
    pub fn oregon() -> &'static FamilyRegistry {
        &OREGON_REGISTRY
    }

    /// Find the family for a sensor ID
    ///
    /// Unknown sensor IDs return `None`.
    pub fn lookup(&self, sensor_id: u16) -> Option<&'static SensorFamily> {
        self.families
            .get(&sensor_id)
            .copied()
            .filter(|family| family.is_well_formed())
    }

    /// Longest frame of any usable family, including the preamble
    pub fn max_frame_nibbles(&self) -> usize {
        self.max_frame_nibbles
    }

    /// All registered `(sensor ID, family)` pairs
    pub fn families(&self) -> impl Iterator<Item = (u16, &'static SensorFamily)> + '_ {
        self.families.entries().map(|(id, family)| (*id, *family))
    }

    /// Number of registered sensor IDs
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// True if no sensor IDs are registered
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

lazy_static! {
    static ref OREGON_REGISTRY: FamilyRegistry = FamilyRegistry::new(&families::OREGON_FAMILIES);
}

#[cfg(test)]
mod tests {
    use super::*;

    static BROKEN: SensorFamily = SensorFamily::new(
        "BROKEN",
        SensorKind::Temperature,
        ProtocolRevision::V2,
        10,
        ChecksumKind::NibbleSum,
        &[FieldDescriptor::new("Late", 7, 2, DecodeRule::Hex)],
    );

    static TOO_LONG: SensorFamily = SensorFamily::new(
        "TOO_LONG",
        SensorKind::Temperature,
        ProtocolRevision::V2,
        MAX_FRAME_NIBBLES,
        ChecksumKind::NibbleSum,
        &[],
    );

    static BROKEN_MAP: FamilyMap = phf::phf_map! {
        0x1234u16 => &BROKEN,
        0x4321u16 => &TOO_LONG,
    };

    #[test]
    fn test_builtin_families_well_formed() {
        let registry = FamilyRegistry::oregon();
        assert!(!registry.is_empty());
        for (id, family) in registry.families() {
            assert!(family.is_well_formed(), "{:04X} {}", id, family);
            assert_eq!(Some(family), registry.lookup(id));
        }
        assert_eq!(22, registry.max_frame_nibbles());
    }

    #[test]
    fn test_shared_layouts() {
        let registry = FamilyRegistry::oregon();
        let thgr = registry.lookup(0x1D20).unwrap();
        assert_eq!(thgr.fields(), registry.lookup(0xF824).unwrap().fields());
        assert_eq!(thgr.fields(), registry.lookup(0xF8B4).unwrap().fields());

        let wind = registry.lookup(0x1984).unwrap();
        assert_eq!(wind, registry.lookup(0x1994).unwrap());

        // rain gauges share field names, not layouts
        let rgr = registry.lookup(0x2D10).unwrap();
        let pcr = registry.lookup(0x2914).unwrap();
        assert_ne!(rgr.payload_nibbles(), pcr.payload_nibbles());
        assert_eq!(
            rgr.fields().iter().map(|f| f.name).collect::<Vec<_>>(),
            pcr.fields().iter().map(|f| f.name).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_unknown_sensor() {
        let registry = FamilyRegistry::oregon();
        assert!(registry.lookup(0x0000).is_none());
        assert!(registry.lookup(0xFFFF).is_none());
        assert!(registry.lookup(0x1D21).is_none());
    }

    #[test]
    fn test_malformed_families_never_match() {
        assert!(!BROKEN.is_well_formed());
        assert!(!TOO_LONG.is_well_formed());

        let registry = FamilyRegistry::new(&BROKEN_MAP);
        assert_eq!(2, registry.len());
        assert!(registry.lookup(0x1234).is_none());
        assert!(registry.lookup(0x4321).is_none());
        assert_eq!(SENSOR_ID_NIBBLES + 1, registry.max_frame_nibbles());
    }

    #[test]
    fn test_family_geometry() {
        let thn = FamilyRegistry::oregon().lookup(0xEC40).unwrap();
        assert_eq!(14, thn.payload_nibbles());
        assert_eq!(15, thn.frame_nibbles());
        assert_eq!(12, thn.checksum_offset());
        assert_eq!(SensorKind::Temperature, thn.kind());
        assert_eq!(4..7, FieldDescriptor::new("x", 4, 3, DecodeRule::Bcd).span());
    }
}
