//! The Oregon Scientific decoder

#[cfg(not(test))]
use log::info;

#[cfg(test)]
use std::println as info;

use crate::builder::OregonDecoderBuilder;
use crate::extract;
use crate::family::FamilyRegistry;
use crate::framing::{FrameOut, NibbleAccumulator};
use crate::message::DecoderError;
use crate::sink::MessageSink;

/// Largest valid nibble value
pub const NIBBLE_MAX: u8 = 0x0f;

/// Oregon Scientific telegram decoder
///
/// The decoder consumes a stream of nibbles from an OOK
/// demodulator and reports every valid telegram to its
/// [target](MessageSink):
///
/// 1. A preamble nibble (`0xA`) starts a candidate frame.
/// 2. The next four nibbles are the sensor ID, which selects
///    a [`SensorFamily`](crate::SensorFamily) and thus the
///    frame length.
/// 3. The family's checksum is verified.
/// 4. Fields are extracted and sent to the target.
///
/// Noise, unknown sensors, and checksum failures are silently
/// discarded, and the decoder resynchronizes on its own.
///
/// ```
/// use oregonrx::{DecodedMessage, OregonDecoder};
///
/// let mut decoder = OregonDecoder::new();
/// decoder.set_target(Vec::<DecodedMessage>::new());
///
/// let telegram = [
///     0xA, 0x1, 0xD, 0x2, 0x0, 0x1, 0x6, 0xB, 0x1,
///     0x0, 0x9, 0x1, 0x0, 0x7, 0x3, 0xA, 0x1, 0x4,
/// ];
/// decoder.decode_message(&telegram).expect("target is set");
///
/// let messages = decoder.take_target().unwrap();
/// assert_eq!(1, messages.len());
/// assert_eq!(Some(190), messages[0].field("Temp"));
/// assert_eq!(Some(37), messages[0].field("Moisture"));
/// ```
///
/// A decoder is meant to serve one receiver on one thread. It
/// does no I/O and has no notion of time: only the order of
/// nibbles matters.
#[derive(Clone, Debug)]
pub struct OregonDecoder<S> {
    accumulator: NibbleAccumulator,
    target: Option<S>,
    accepted: u64,
}

impl<S> OregonDecoder<S>
where
    S: MessageSink,
{
    /// New decoder with default settings and no target
    ///
    /// See [`OregonDecoderBuilder`] for options.
    pub fn new() -> Self {
        OregonDecoderBuilder::default().build()
    }

    /// Set the message target
    ///
    /// The target must be set before any input is given.
    /// Returns the previous target, if any.
    pub fn set_target(&mut self, target: S) -> Option<S> {
        self.target.replace(target)
    }

    /// Current message target
    pub fn target(&self) -> Option<&S> {
        self.target.as_ref()
    }

    /// Current message target, mutably
    pub fn target_mut(&mut self) -> Option<&mut S> {
        self.target.as_mut()
    }

    /// Remove and return the message target
    ///
    /// The decoder will refuse input until a new target is set.
    pub fn take_target(&mut self) -> Option<S> {
        self.target.take()
    }

    /// Handle received nibble
    ///
    /// Accepts one `nibble` (`0x0 ..= 0xF`) from the demodulator.
    /// If it completes a valid telegram, the target's
    /// [`parsed_message()`](MessageSink::parsed_message) is
    /// called before this method returns.
    ///
    /// Fails, without changing any decoder state, if no target
    /// is set or if `nibble` is out of range.
    pub fn add_nibble(&mut self, nibble: u8) -> Result<(), DecoderError> {
        if nibble > NIBBLE_MAX {
            return Err(DecoderError::NibbleOutOfRange(nibble));
        }
        let target = self.target.as_mut().ok_or(DecoderError::NoTarget)?;

        if let FrameOut::Ready(frame, family) = self.accumulator.input(nibble) {
            let message = extract::extract(&frame[1..], family);
            info!("message: {}", message);
            self.accepted = self.accepted.wrapping_add(1);
            target.parsed_message(message);
        }

        Ok(())
    }

    /// Handle a sequence of received nibbles
    ///
    /// Equivalent to calling [`add_nibble()`](Self::add_nibble)
    /// for each element of `nibbles`, in order. Stops at the
    /// first error; nibbles before it have been processed.
    pub fn decode_message(&mut self, nibbles: &[u8]) -> Result<(), DecoderError> {
        for &nibble in nibbles {
            self.add_nibble(nibble)?;
        }
        Ok(())
    }

    /// Discard any partially-received telegram
    ///
    /// The target and lifetime counters are kept.
    pub fn reset(&mut self) {
        self.accumulator.reset();
    }

    /// Lifetime count of telegrams sent to the target
    pub fn frames_accepted(&self) -> u64 {
        self.accepted
    }

    /// Lifetime count of candidate telegrams discarded
    ///
    /// Includes unknown sensor IDs and checksum failures.
    pub fn frames_rejected(&self) -> u64 {
        self.accumulator.rejected()
    }

    /// Start-of-frame nibble
    pub fn preamble(&self) -> u8 {
        self.accumulator.preamble()
    }
}

impl<S> Default for OregonDecoder<S>
where
    S: MessageSink,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> OregonDecoder<S> {
    /// Create from the builder's settings and an optional target
    pub(crate) fn with_parts(
        registry: &'static FamilyRegistry,
        preamble: u8,
        target: Option<S>,
    ) -> Self {
        Self {
            accumulator: NibbleAccumulator::new(registry, preamble),
            target,
            accepted: 0,
        }
    }
}
