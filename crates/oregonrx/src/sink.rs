//! Message targets

use std::sync::mpsc::Sender;

#[cfg(not(test))]
use log::warn;

#[cfg(test)]
use std::println as warn;

use crate::message::DecodedMessage;

/// Receives decoded messages
///
/// The decoder calls [`parsed_message()`](Self::parsed_message)
/// exactly once for every valid telegram, synchronously, before
/// [`add_nibble()`](crate::OregonDecoder::add_nibble) returns.
///
/// Stock implementations are provided for:
///
/// * `&mut T` and `Box<T>`, where `T` is a `MessageSink`,
///   so the decoder may borrow a sink it does not own
/// * `Vec<DecodedMessage>`, which collects every message
/// * [`Sender<DecodedMessage>`](std::sync::mpsc::Sender),
///   which hands messages to another thread
/// * [`FnSink`], which wraps a closure
pub trait MessageSink {
    /// Handle one decoded message
    fn parsed_message(&mut self, message: DecodedMessage);
}

impl<T> MessageSink for &mut T
where
    T: MessageSink + ?Sized,
{
    fn parsed_message(&mut self, message: DecodedMessage) {
        (**self).parsed_message(message)
    }
}

impl<T> MessageSink for Box<T>
where
    T: MessageSink + ?Sized,
{
    fn parsed_message(&mut self, message: DecodedMessage) {
        (**self).parsed_message(message)
    }
}

impl MessageSink for Vec<DecodedMessage> {
    fn parsed_message(&mut self, message: DecodedMessage) {
        self.push(message)
    }
}

impl MessageSink for Sender<DecodedMessage> {
    fn parsed_message(&mut self, message: DecodedMessage) {
        if let Err(e) = self.send(message) {
            warn!("sink: receiver hung up; dropping \"{}\"", e.0);
        }
    }
}

/// Closure message target
///
/// ```
/// use oregonrx::{DecodedMessage, FnSink, MessageSink};
///
/// let mut count = 0;
/// let mut sink = FnSink(|_msg: DecodedMessage| count += 1);
/// sink.parsed_message(DecodedMessage::new("THN132N", []));
/// drop(sink);
/// assert_eq!(1, count);
/// ```
#[derive(Clone, Debug)]
pub struct FnSink<F>(pub F);

impl<F> MessageSink for FnSink<F>
where
    F: FnMut(DecodedMessage),
{
    fn parsed_message(&mut self, message: DecodedMessage) {
        (self.0)(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::mpsc::channel;

    use crate::message::FieldValue;

    fn make_message(temp: i32) -> DecodedMessage {
        DecodedMessage::new("THN132N", [FieldValue::new("Temp", temp)])
    }

    fn deliver<S: MessageSink>(mut sink: S, temp: i32) {
        sink.parsed_message(make_message(temp));
    }

    #[test]
    fn test_borrowed_vec() {
        let mut out: Vec<DecodedMessage> = vec![];
        deliver(&mut out, 1);
        deliver(&mut out, 2);
        assert_eq!(vec![make_message(1), make_message(2)], out);
    }

    #[test]
    fn test_boxed_dyn() {
        let mut out: Vec<DecodedMessage> = vec![];
        {
            let boxed: Box<dyn MessageSink + '_> = Box::new(&mut out);
            deliver(boxed, 5);
        }
        assert_eq!(Some(5), out[0].field("Temp"));
    }

    #[test]
    fn test_channel() {
        let (tx, rx) = channel();
        deliver(tx.clone(), 7);
        assert_eq!(Some(7), rx.recv().unwrap().field("Temp"));

        // hung-up receivers are not fatal
        drop(rx);
        deliver(tx, 8);
    }
}
