//! Oregon Scientific telegram framing

use arraydeque::{ArrayDeque, Saturating};
use arrayvec::ArrayVec;

#[cfg(not(test))]
use log::{debug, trace};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as trace;

use crate::checksum;
use crate::family::{FamilyRegistry, SensorFamily, MAX_FRAME_NIBBLES, SENSOR_ID_NIBBLES};

/// A complete telegram, preamble first
pub type Frame = ArrayVec<u8, MAX_FRAME_NIBBLES>;

/// Framing status
///
/// Reported by the [`NibbleAccumulator`] after every nibble.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOut {
    /// No preamble yet; input is being discarded
    Searching,

    /// A candidate frame is being read
    Reading,

    /// A complete frame has passed its checksum
    ///
    /// The frame includes the preamble. The family is the one
    /// matched by the frame's sensor ID.
    Ready(Frame, &'static SensorFamily),
}

impl FrameOut {
    /// True if a frame is in progress or complete
    pub fn is_active(&self) -> bool {
        !matches!(self, FrameOut::Searching)
    }
}

/// Collects nibbles into checksum-valid frames
///
/// The `NibbleAccumulator` does nothing until it sees the
/// preamble nibble. It then reads four sensor ID nibbles and
/// looks up the sensor's family, which determines the exact
/// frame length. Once that many nibbles have arrived, the
/// frame's checksum is verified.
///
/// Every preamble nibble in the buffer starts a *candidate*
/// frame, and all candidates are tracked at once. A preamble
/// value which is really part of a good frame's data is
/// harmless: the enclosing frame completes first and the
/// buffer is cleared. A real frame that begins inside noise is
/// still found as soon as its last nibble arrives.
///
/// Candidates with unknown sensor IDs or bad checksums are
/// dropped. The oldest live candidate bounds the buffer, so it
/// never holds more than one frame of the longest family in
/// the registry.
#[derive(Clone, Debug)]
pub struct NibbleAccumulator {
    // nibbles since the last sync; front is always a preamble
    buf: ArrayDeque<u8, MAX_FRAME_NIBBLES, Saturating>,

    // sensor families
    registry: &'static FamilyRegistry,

    // start-of-frame nibble
    preamble: u8,

    // lifetime count of candidate frames dropped
    rejected: u64,
}

// State of the candidate frame at some buffer offset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Candidate {
    // still reading
    Partial,

    // exactly one frame long; checksum not yet known
    Complete(&'static SensorFamily),

    // unknown sensor or past its end
    Dead,
}

impl NibbleAccumulator {
    /// New accumulator
    ///
    /// Frames begin with `preamble` and are matched against the
    /// families in `registry`.
    pub fn new(registry: &'static FamilyRegistry, preamble: u8) -> Self {
        Self {
            buf: ArrayDeque::new(),
            registry,
            preamble: preamble & 0x0f,
            rejected: 0,
        }
    }

    /// Reset to zero initial conditions
    ///
    /// The lifetime rejection count is preserved.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Handle received nibble
    ///
    /// Accepts a single `nibble`, which must be in the range
    /// `0x0 ..= 0xF`, and attempts to frame a telegram. At most
    /// one frame completes per nibble. When it does, the buffer
    /// is emptied.
    pub fn input(&mut self, nibble: u8) -> FrameOut {
        if self.buf.is_empty() && nibble != self.preamble {
            return FrameOut::Searching;
        }

        if self.buf.push_back(nibble).is_err() {
            // not reachable with well-formed families
            self.buf.pop_front();
            self.prune();
            if self.buf.push_back(nibble).is_err() {
                self.buf.clear();
            }
        }

        if let Some((frame, family)) = self.scan() {
            self.buf.clear();
            return FrameOut::Ready(frame, family);
        }

        self.prune();
        if self.buf.is_empty() {
            FrameOut::Searching
        } else {
            FrameOut::Reading
        }
    }

    /// Lifetime count of dropped candidate frames
    ///
    /// Counts frames with unknown sensor IDs or bad checksums.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Number of buffered nibbles, including the preamble
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if no candidate frame is in progress
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Start-of-frame nibble
    pub fn preamble(&self) -> u8 {
        self.preamble
    }

    // Check every candidate that the newest nibble affects
    //
    // Returns the oldest candidate which has just completed
    // with a valid checksum.
    fn scan(&mut self) -> Option<(Frame, &'static SensorFamily)> {
        let len = self.buf.len();
        for start in 0..len {
            if self.buf.get(start) != Some(&self.preamble) {
                continue;
            }

            match self.candidate(start) {
                Candidate::Complete(family) => {
                    let frame: Frame = self.buf.iter().skip(start).copied().collect();
                    if checksum::validate(&frame[1..], family) {
                        debug!(
                            "framing: {} frame complete after {} nibbles of noise",
                            family.model(),
                            start
                        );
                        return Some((frame, family));
                    }

                    debug!("framing: {}: bad checksum", family.model());
                    self.rejected = self.rejected.wrapping_add(1);
                }
                Candidate::Dead if len - start == SENSOR_ID_NIBBLES + 1 => {
                    trace!("framing: unknown sensor {:04X}", self.sensor_id(start));
                    self.rejected = self.rejected.wrapping_add(1);
                }
                _ => {}
            }
        }

        None
    }

    // Drop leading nibbles until the oldest candidate is live
    fn prune(&mut self) {
        while let Some(&nibble) = self.buf.front() {
            if nibble == self.preamble && self.candidate(0) == Candidate::Partial {
                break;
            }
            self.buf.pop_front();
        }
    }

    // Classify the candidate frame beginning at `start`
    fn candidate(&self, start: usize) -> Candidate {
        let avail = self.buf.len() - start;
        if avail <= SENSOR_ID_NIBBLES {
            return Candidate::Partial;
        }

        match self.registry.lookup(self.sensor_id(start)) {
            Some(family) if avail < family.frame_nibbles() => Candidate::Partial,
            Some(family) if avail == family.frame_nibbles() => Candidate::Complete(family),
            _ => Candidate::Dead,
        }
    }

    // sensor ID from the four nibbles after the preamble at `start`
    fn sensor_id(&self, start: usize) -> u16 {
        self.buf
            .iter()
            .skip(start + 1)
            .take(SENSOR_ID_NIBBLES)
            .fold(0u16, |acc, &n| (acc << 4) | n as u16)
    }
}
