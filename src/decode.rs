//! Image decoding for the canvas load lifecycle.
//!
//! Decoding is the only asynchronous step in the core. Each load is tagged
//! with a [`LoadTicket`]; the canvas only accepts the outcome whose ticket
//! matches its current load, so a late result for a superseded image is
//! dropped instead of overwriting newer state.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use thiserror::Error;

/// Identity of one image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// Errors from decoding an image resource.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The bytes are not a supported image
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// Decoded, but the raster has no pixels
    #[error("image has zero dimensions ({width}x{height})")]
    ZeroDimensions { width: u32, height: u32 },

    /// The decoder thread could not be started or has stopped
    #[error("decoder thread unavailable: {0}")]
    ThreadUnavailable(String),
}

/// A decoded raster in RGBA8, ready to draw.
#[derive(Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba_len", &self.rgba.len())
            .finish()
    }
}

/// Decode image bytes synchronously.
pub fn decode_image(data: &[u8]) -> Result<DecodedImage, DecodeError> {
    let img = image::load_from_memory(data)?;
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroDimensions { width, height });
    }
    Ok(DecodedImage {
        width,
        height,
        rgba: img.into_rgba8().into_raw(),
    })
}

/// Result of one background decode.
#[derive(Debug)]
pub struct DecodeOutcome {
    pub ticket: LoadTicket,
    pub result: Result<DecodedImage, DecodeError>,
}

struct DecodeRequest {
    ticket: LoadTicket,
    data: Vec<u8>,
}

enum ThreadMessage {
    Decode(DecodeRequest),
    Shutdown,
}

/// Background thread that decodes images off the UI thread.
///
/// Requests are processed in order; results are polled with
/// [`DecoderThread::try_recv`] from the event loop.
pub struct DecoderThread {
    request_tx: Sender<ThreadMessage>,
    result_rx: Receiver<DecodeOutcome>,
    thread_handle: Option<JoinHandle<()>>,
    pending: usize,
}

impl DecoderThread {
    pub fn spawn() -> Result<Self, DecodeError> {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<DecodeOutcome>();

        let thread_handle = thread::Builder::new()
            .name("image-decoder".to_string())
            .spawn(move || {
                log::debug!("Image decoder thread started");
                Self::thread_loop(request_rx, result_tx);
                log::debug!("Image decoder thread exiting");
            })
            .map_err(|e| DecodeError::ThreadUnavailable(e.to_string()))?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
            pending: 0,
        })
    }

    fn thread_loop(request_rx: Receiver<ThreadMessage>, result_tx: Sender<DecodeOutcome>) {
        while let Ok(ThreadMessage::Decode(request)) = request_rx.recv() {
            log::debug!("Decoding {} ({} bytes)", request.ticket, request.data.len());
            let outcome = DecodeOutcome {
                ticket: request.ticket,
                result: decode_image(&request.data),
            };
            if result_tx.send(outcome).is_err() {
                log::warn!("Result channel closed, decoder thread exiting");
                break;
            }
        }
    }

    /// Queue a decode for `ticket`.
    pub fn request(&mut self, ticket: LoadTicket, data: Vec<u8>) -> Result<(), DecodeError> {
        self.request_tx
            .send(ThreadMessage::Decode(DecodeRequest { ticket, data }))
            .map_err(|_| DecodeError::ThreadUnavailable("request channel closed".to_string()))?;
        self.pending += 1;
        Ok(())
    }

    /// Take one finished decode, if any. Non-blocking.
    pub fn try_recv(&mut self) -> Option<DecodeOutcome> {
        match self.result_rx.try_recv() {
            Ok(outcome) => {
                self.pending = self.pending.saturating_sub(1);
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Decoder thread disconnected");
                None
            }
        }
    }

    /// Block until the next decode finishes.
    pub fn recv(&mut self) -> Option<DecodeOutcome> {
        let outcome = self.result_rx.recv().ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(outcome)
    }

    pub fn pending_count(&self) -> usize {
        self.pending
    }
}

impl Drop for DecoderThread {
    fn drop(&mut self) {
        let _ = self.request_tx.send(ThreadMessage::Shutdown);
        if let Some(handle) = self.thread_handle.take()
            && handle.join().is_err()
        {
            log::warn!("Decoder thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let decoded = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.rgba.len(), 3 * 2 * 4);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(DecodeError::Image(_))
        ));
    }

    #[test]
    fn test_thread_preserves_tickets() {
        let mut decoder = DecoderThread::spawn().unwrap();
        decoder.request(LoadTicket(1), png_bytes(4, 4)).unwrap();
        decoder.request(LoadTicket(2), vec![0, 1, 2]).unwrap();
        assert_eq!(decoder.pending_count(), 2);

        let first = decoder.recv().unwrap();
        assert_eq!(first.ticket, LoadTicket(1));
        assert_eq!(first.result.unwrap().width, 4);

        let second = decoder.recv().unwrap();
        assert_eq!(second.ticket, LoadTicket(2));
        assert!(second.result.is_err());
        assert_eq!(decoder.pending_count(), 0);
        assert!(decoder.try_recv().is_none());
    }
}
