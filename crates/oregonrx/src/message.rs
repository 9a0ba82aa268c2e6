//! Decoder outputs for the client

use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

/// Protocol class reported with every [`DecodedMessage`]
pub const PROTOCOL_NAME: &str = "Oregon";

/// Most fields any family may report
pub const MAX_FIELDS: usize = 8;

/// A named integer field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldValue {
    name: &'static str,
    value: i32,
}

impl FieldValue {
    /// New field
    pub fn new(name: &'static str, value: i32) -> Self {
        Self { name, value }
    }

    /// Field name, like "`Temp`"
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field value
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            "SensorId" | "Id" => write!(f, "{}=0x{:X}", self.name, self.value),
            _ => write!(f, "{}={}", self.name, self.value),
        }
    }
}

/// Ordered list of fields in a message
pub type FieldList = ArrayVec<FieldValue, MAX_FIELDS>;

/// A fully-decoded sensor telegram
///
/// Each `DecodedMessage` carries the [protocol](Self::protocol)
/// tag "`Oregon`," the model name of the matching sensor family,
/// and an ordered list of named integer fields. Field order
/// follows the family's declaration and is the same every time
/// the same telegram is decoded.
///
/// Values are reported as the sensor transmits them. A `Temp`
/// of `190` means 19.0 °C; converting units is up to you.
///
/// ```
/// use oregonrx::{DecodedMessage, FieldValue};
///
/// let msg = DecodedMessage::new(
///     "THN132N",
///     [FieldValue::new("SensorId", 0xEC40), FieldValue::new("Temp", -190)],
/// );
/// assert_eq!("Oregon", msg.protocol());
/// assert_eq!(Some(-190), msg.field("Temp"));
/// assert_eq!(None, msg.field("Moisture"));
/// assert_eq!(Some(0xEC40), msg.sensor_id());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecodedMessage {
    model: &'static str,
    fields: FieldList,
}

impl DecodedMessage {
    /// New message from a model name and fields
    ///
    /// Fields beyond [`MAX_FIELDS`] are dropped.
    pub fn new<I>(model: &'static str, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldValue>,
    {
        Self {
            model,
            fields: fields.into_iter().take(MAX_FIELDS).collect(),
        }
    }

    /// Protocol class, always "`Oregon`"
    pub fn protocol(&self) -> &'static str {
        PROTOCOL_NAME
    }

    /// Model name of the matching sensor family
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// All fields, in declaration order
    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    /// Look up a field by name
    ///
    /// Returns the value of the first field with the given
    /// `name`, or `None` if there is no such field.
    pub fn field(&self, name: &str) -> Option<i32> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(FieldValue::value)
    }

    /// Sensor ID, like `0x1D20`
    pub fn sensor_id(&self) -> Option<u16> {
        self.field("SensorId").and_then(|id| u16::try_from(id).ok())
    }

    /// Iterate over fields
    pub fn iter(&self) -> std::slice::Iter<'_, FieldValue> {
        self.fields.iter()
    }
}

impl<'m> IntoIterator for &'m DecodedMessage {
    type Item = &'m FieldValue;
    type IntoIter = std::slice::Iter<'m, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:", PROTOCOL_NAME, self.model)?;
        for field in &self.fields {
            write!(f, " {}", field)?;
        }
        Ok(())
    }
}

/// Decoder misuse
///
/// Noise, truncated telegrams, unknown sensors, and checksum
/// failures are *not* errors; they are silently discarded.
/// A `DecoderError` means the caller broke the decoder's
/// contract.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecoderError {
    /// Input was given before a message target was set
    #[error("no message target: call set_target() before decoding")]
    NoTarget,

    /// Input value does not fit in four bits
    #[error("nibble value {0} out of range (0 – 15)")]
    NibbleOutOfRange(u8),
}
