use crate::decoder::OregonDecoder;
use crate::family::{FamilyRegistry, PREAMBLE};
use crate::sink::MessageSink;

/// Builds an Oregon Scientific decoder
///
/// The builder comes with sensible defaults: the built-in
/// [sensor table](FamilyRegistry::oregon) and the standard
/// `0xA` preamble. Most users will never need to change them.
///
/// ```
/// use oregonrx::{DecodedMessage, OregonDecoder, OregonDecoderBuilder};
///
/// let mut decoder: OregonDecoder<Vec<DecodedMessage>> = OregonDecoderBuilder::new()
///     .with_preamble(0xA)
///     .build_with_target(vec![]);
/// assert_eq!(0xA, decoder.preamble());
/// assert!(decoder.target().unwrap().is_empty());
/// ```
///
/// The API specified by the builder is part of this crate's
/// API. The contents of the built-in sensor table are *not*,
/// and new families may appear in any minor release.
#[derive(Clone, Copy, Debug)]
pub struct OregonDecoderBuilder {
    registry: &'static FamilyRegistry,
    preamble: u8,
}

impl OregonDecoderBuilder {
    /// New decoder with default options
    pub fn new() -> Self {
        Self {
            registry: FamilyRegistry::oregon(),
            preamble: PREAMBLE,
        }
    }

    /// Build a decoder with no target
    ///
    /// You must [set a target](OregonDecoder::set_target) before
    /// giving the decoder any input.
    pub fn build<S: MessageSink>(&self) -> OregonDecoder<S> {
        OregonDecoder::with_parts(self.registry, self.preamble, None)
    }

    /// Build a decoder which reports to `target`
    ///
    /// The decoder is immediately ready for input.
    pub fn build_with_target<S: MessageSink>(&self, target: S) -> OregonDecoder<S> {
        OregonDecoder::with_parts(self.registry, self.preamble, Some(target))
    }

    /// Sensor family table
    ///
    /// Only sensors in the `registry` will be decoded. The
    /// default is [`FamilyRegistry::oregon()`].
    pub fn with_registry(&mut self, registry: &'static FamilyRegistry) -> &mut Self {
        self.registry = registry;
        self
    }

    /// Start-of-frame nibble
    ///
    /// Every telegram begins with this nibble, which is not part
    /// of the checksum. Only the low four bits are used.
    pub fn with_preamble(&mut self, preamble: u8) -> &mut Self {
        self.preamble = preamble & 0x0f;
        self
    }

    /// Sensor family table
    pub fn registry(&self) -> &'static FamilyRegistry {
        self.registry
    }

    /// Start-of-frame nibble
    pub fn preamble(&self) -> u8 {
        self.preamble
    }
}

impl std::default::Default for OregonDecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lazy_static::lazy_static;
    use phf::phf_map;

    use crate::checksum::ChecksumKind;
    use crate::family::{
        DecodeRule, FamilyMap, FieldDescriptor, ProtocolRevision, SensorFamily, SensorKind,
    };
    use crate::message::DecodedMessage;

    static ID_ONLY: SensorFamily = SensorFamily::new(
        "ID_ONLY",
        SensorKind::Temperature,
        ProtocolRevision::V2,
        14,
        ChecksumKind::NibbleSum,
        &[FieldDescriptor::new("SensorId", 0, 4, DecodeRule::Hex)],
    );

    static ID_ONLY_MAP: FamilyMap = phf_map! {
        0xEC40u16 => &ID_ONLY,
    };

    lazy_static! {
        static ref ID_ONLY_REGISTRY: FamilyRegistry = FamilyRegistry::new(&ID_ONLY_MAP);
    }

    fn nibbles(hex: &str) -> Vec<u8> {
        hex.chars()
            .map(|c| c.to_digit(16).expect("hex digit") as u8)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let builder = OregonDecoderBuilder::default();
        assert_eq!(PREAMBLE, builder.preamble());
        assert!(std::ptr::eq(FamilyRegistry::oregon(), builder.registry()));

        let decoder: OregonDecoder<Vec<DecodedMessage>> = builder.build();
        assert!(decoder.target().is_none());
        assert_eq!(PREAMBLE, decoder.preamble());
    }

    #[test]
    fn test_custom_preamble() {
        let mut decoder = OregonDecoderBuilder::new()
            .with_preamble(0xF5)
            .build_with_target(vec![]);
        assert_eq!(0x5, decoder.preamble());

        // preamble is not covered by the checksum
        decoder.decode_message(&nibbles("AEC4016B1091834")).unwrap();
        assert!(decoder.target().unwrap().is_empty());
        decoder.decode_message(&nibbles("5EC4016B1091834")).unwrap();
        assert_eq!(Some(-190), decoder.target().unwrap()[0].field("Temp"));
    }

    #[test]
    fn test_custom_registry() {
        let mut decoder = OregonDecoderBuilder::new()
            .with_registry(&ID_ONLY_REGISTRY)
            .build_with_target(vec![]);

        decoder.decode_message(&nibbles("A1D2016B1091073A14")).unwrap();
        assert!(decoder.target().unwrap().is_empty());

        decoder.decode_message(&nibbles("AEC4016B1091834")).unwrap();
        let out = decoder.take_target().unwrap();
        assert_eq!(1, out.len());
        assert_eq!("ID_ONLY", out[0].model());
        assert_eq!(1, out[0].fields().len());
        assert_eq!(Some(0xEC40), out[0].sensor_id());
    }
}
