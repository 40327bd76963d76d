//! Length-prefixed JSON framing and a tokio-backed [`FramedPort`].
//!
//! Each frame is a 4-byte `u32` length prefix in native endianness followed
//! by that many bytes of UTF-8 JSON. Stdout is reserved for frames: never
//! `println!` in a process that runs a stdio port.

use serde::Serialize;
use std::io::{self, Read, Write};

use crate::error::BridgeError;

#[inline]
fn read_exact_u32_len<R: Read>(r: &mut R) -> Result<u32, BridgeError> {
    let mut len_buf = [0u8; 4];
    match r.read_exact(&mut len_buf) {
        Ok(()) => Ok(u32::from_ne_bytes(len_buf)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(BridgeError::Disconnected),
        Err(e) => Err(e.into()),
    }
}

/// Encode any serde-serializable value into a frame, refusing bodies larger
/// than `max_size`.
pub fn encode_frame<T: Serialize>(msg: &T, max_size: usize) -> Result<Vec<u8>, BridgeError> {
    let json = serde_json::to_vec(msg)?;
    if json.len() > max_size || json.len() > u32::MAX as usize {
        return Err(BridgeError::FrameTooLarge {
            len: json.len(),
            limit: max_size,
        });
    }
    let mut out = Vec::with_capacity(4 + json.len());
    out.extend_from_slice(&(json.len() as u32).to_ne_bytes());
    out.extend_from_slice(&json);
    Ok(out)
}

/// Decode a single frame from a reader.
///
/// EOF before the length prefix is [`BridgeError::Disconnected`]; the size
/// check happens before the body is read.
pub fn decode_frame<R: Read>(reader: &mut R, max_size: usize) -> Result<String, BridgeError> {
    let len = read_exact_u32_len(&mut *reader)? as usize;
    if len > max_size {
        return Err(BridgeError::FrameTooLarge {
            len,
            limit: max_size,
        });
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| BridgeError::InvalidUtf8)
}

/// Write one already-encoded frame and flush.
pub fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> io::Result<()> {
    writer.write_all(frame)?;
    writer.flush()
}

#[cfg(feature = "stdio")]
pub use framed::FramedPort;

#[cfg(feature = "stdio")]
mod framed {
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::io::{self, Read, Write};
    use tokio::runtime::Handle;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tracing::{debug, trace, warn};

    use super::{decode_frame, encode_frame, write_frame};
    use crate::config::BridgeConfig;
    use crate::error::BridgeError;
    use crate::port::{HostPort, InboundListener};

    type BoxedReader = Box<dyn Read + Send>;

    /// A [`HostPort`] over a pair of byte streams.
    ///
    /// Outbound frames go through an unbounded queue drained by a blocking
    /// writer task, so `post_message` never blocks. The blocking reader task
    /// starts when the bridge installs its listener.
    pub struct FramedPort {
        handle: Handle,
        max_outbound: usize,
        max_inbound: usize,
        tx: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
        writer: Mutex<Option<JoinHandle<io::Result<()>>>>,
        reader: Mutex<Option<BoxedReader>>,
        reader_task: Mutex<Option<JoinHandle<()>>>,
    }

    impl FramedPort {
        /// Bind to the process's stdin/stdout.
        pub fn stdio(config: &BridgeConfig) -> Result<Self, BridgeError> {
            Self::new(io::stdin(), io::stdout(), config)
        }

        /// Spawn the writer task over `writer`; `reader` is held until `listen`.
        /// Must be called from within a tokio runtime.
        pub fn new<R, W>(reader: R, writer: W, config: &BridgeConfig) -> Result<Self, BridgeError>
        where
            R: Read + Send + 'static,
            W: Write + Send + 'static,
        {
            let handle = Handle::try_current().map_err(|_| BridgeError::NoRuntime)?;
            let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();

            let writer_task = handle.spawn_blocking(move || -> io::Result<()> {
                let mut writer = writer;
                while let Some(frame) = rx.blocking_recv() {
                    write_frame(&mut writer, &frame)?;
                }
                Ok(())
            });

            Ok(Self {
                handle,
                max_outbound: config.max_outbound_bytes,
                max_inbound: config.max_inbound_bytes,
                tx: Mutex::new(Some(tx)),
                writer: Mutex::new(Some(writer_task)),
                reader: Mutex::new(Some(Box::new(reader))),
                reader_task: Mutex::new(None),
            })
        }

        /// Stop accepting outbound messages, flush what is queued and join
        /// the writer. Later posts fail with [`BridgeError::Disconnected`].
        pub async fn close(&self) -> Result<(), BridgeError> {
            drop(self.tx.lock().take());
            let task = self.writer.lock().take();
            match task {
                Some(task) => match task.await {
                    Ok(res) => res.map_err(BridgeError::from),
                    Err(_) => Err(BridgeError::Disconnected),
                },
                None => Ok(()),
            }
        }

        /// Wait until the host closes its end of the inbound stream. Returns
        /// immediately if no listener was ever installed.
        pub async fn closed(&self) {
            let task = self.reader_task.lock().take();
            if let Some(task) = task {
                let _ = task.await;
            }
        }
    }

    impl HostPort for FramedPort {
        fn listen(&self, listener: InboundListener) {
            let Some(mut reader) = self.reader.lock().take() else {
                warn!("framed port already has a listener; ignoring second install");
                return;
            };
            let max_inbound = self.max_inbound;
            let task = self.handle.spawn_blocking(move || loop {
                match decode_frame(&mut reader, max_inbound) {
                    Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                        Ok(value) => listener(value),
                        Err(e) => trace!(error = %e, "dropping non-JSON frame"),
                    },
                    Err(BridgeError::InvalidUtf8) => trace!("dropping non-UTF-8 frame"),
                    Err(BridgeError::Disconnected) => {
                        debug!("host closed the inbound stream");
                        return;
                    }
                    // the stream position is unknown after a bad length, so give up
                    Err(e) => {
                        warn!(error = %e, "inbound stream failed; stopping reader");
                        return;
                    }
                }
            });
            *self.reader_task.lock() = Some(task);
        }

        fn post_message(&self, message: &Value, target_origin: &str) -> Result<(), BridgeError> {
            let frame = encode_frame(message, self.max_outbound)?;
            trace!(target_origin, bytes = frame.len(), "queueing frame");
            match self.tx.lock().as_ref() {
                Some(tx) => tx.send(frame).map_err(|_| BridgeError::Disconnected),
                None => Err(BridgeError::Disconnected),
            }
        }
    }
}
