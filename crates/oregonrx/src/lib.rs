//! # oregonrx: Oregon Scientific telegram decoder
//!
//! This crate decodes the digital telegrams sent by Oregon Scientific
//! wireless weather sensors: thermometers, hygrometers, anemometers,
//! rain gauges, and barometers. It turns a stream of 4-bit *nibbles*
//! into named integer fields like `Temp`, `Moisture`, and `Wind`.
//!
//! ## Disclaimer
//!
//! This crate is dual-licensed MIT and Apache 2.0. Read these licenses
//! carefully as they may affect your rights.
//!
//! This crate is not affiliated with Oregon Scientific.
//!
//! ## Example
//!
//! You will first need to recover *nibbles* from the 433.92 MHz band.
//! Sensors transmit with on-off keying (OOK) and Manchester coding.
//! Receiving and demodulating the RF signal is beyond the scope of
//! this crate. A cheap OOK receiver module or a software-defined
//! radio, followed by a Manchester decoder, will do. Once you have
//! bits, pack them into nibbles and feed them to the decoder in the
//! order they were received.
//!
//! ```
//! use oregonrx::{DecodedMessage, FnSink, OregonDecoderBuilder};
//!
//! # let some_nibble_source = || {
//! #     [0xAu8, 0x1, 0xD, 0x2, 0x0, 0x1, 0x6, 0xB, 0x1,
//! #      0x0, 0x9, 0x1, 0x0, 0x7, 0x3, 0xA, 0x1, 0x4].into_iter()
//! # };
//! #
//! let mut temperatures = vec![];
//!
//! // create a decoder which reports to a closure
//! let mut decoder = OregonDecoderBuilder::new()
//!     .build_with_target(FnSink(|msg: DecodedMessage| {
//!         println!("{}", msg);
//!         if let Some(temp) = msg.field("Temp") {
//!             temperatures.push(temp);
//!         }
//!     }));
//!
//! // let the nibble source be any iterator over received nibbles
//! for nibble in some_nibble_source() {
//!     // in actual implementations, handle this error gracefully!
//!     decoder.add_nibble(nibble).expect("nibble out of range");
//! }
//!
//! drop(decoder);
//! assert_eq!(vec![190], temperatures);
//! ```
//!
//! The decoder is created via a
//! [builder](struct.OregonDecoderBuilder.html).
//!
//! The [`OregonDecoder`](struct.OregonDecoder.html) accepts one nibble
//! at a time with [`add_nibble()`](OregonDecoder::add_nibble) or many
//! at once with [`decode_message()`](OregonDecoder::decode_message).
//! Every valid telegram is sent to the decoder's
//! [`MessageSink`](trait.MessageSink.html) before the call returns.
//! Stock sinks collect messages into a `Vec`, send them over a
//! channel, or call a closure.
//!
//! The printed message looks like:
//!
//! ```txt
//! Oregon THGR122NX: SensorId=0x1D20 Channel=1 Id=0x6B LowBattery=0 Temp=190 Moisture=37
//! ```
//!
//! Values are reported as sent. Temperatures are in tenths of a
//! degree Celsius, so `Temp=190` is 19.0 °C.
//!
//! ## Background
//!
//! Every telegram begins with a preamble nibble, `0xA`, followed by a
//! four-nibble *sensor ID*. The sensor ID identifies the *family* of
//! the sensor, which fixes the length of the telegram and the
//! position of each field. A two-nibble checksum closes the telegram.
//!
//! The built-in [family table](FamilyRegistry::oregon) knows the
//! following sensors:
//!
//! | Sensor ID              | Models             | Kind                      |
//! |------------------------|--------------------|---------------------------|
//! | `1D20`, `F824`, `F8B4` | THGR122NX, THGR810 | temperature and humidity  |
//! | `EC40`, `C844`         | THN132N, THWR800   | temperature               |
//! | `1984`, `1994`         | WGR800             | wind                      |
//! | `2D10`                 | RGR918             | rain                      |
//! | `2914`                 | PCR800             | rain                      |
//! | `5D60`                 | BTHR918N           | temperature, humidity, and pressure |
//!
//! Noise is common on the 433 MHz band. The decoder discards garbage,
//! unknown sensors, and telegrams with bad checksums without
//! complaint. It resynchronizes on its own.
//!
//! ## Logging
//!
//! Decoded messages are logged at `info` level via the
//! [log](https://crates.io/crates/log) crate. Rejected telegrams are
//! logged at `debug` and `trace`. Bring your own logger.

mod builder;
mod checksum;
mod decoder;
mod extract;
mod families;
mod family;
mod framing;
mod message;
mod sink;

pub use builder::OregonDecoderBuilder;
pub use checksum::ChecksumKind;
pub use decoder::{OregonDecoder, NIBBLE_MAX};
pub use extract::{channel_from_raw, CHANNEL_MAP};
pub use family::{
    DecodeRule, FamilyMap, FamilyRegistry, FieldDescriptor, ProtocolRevision, SensorFamily,
    SensorKind, CHECKSUM_NIBBLES, MAX_FRAME_NIBBLES, PREAMBLE, SENSOR_ID_NIBBLES,
};
pub use framing::{Frame, FrameOut, NibbleAccumulator};
pub use message::{DecodedMessage, DecoderError, FieldList, FieldValue, MAX_FIELDS, PROTOCOL_NAME};
pub use sink::{FnSink, MessageSink};
