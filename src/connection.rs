use crate::resp::{RespError, RespParser, RespValue};
use bytes::BytesMut;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// A framed byte stream: one decoded value in, one encoded value out.
///
/// Reads are buffered so a value split across several TCP segments is
/// reassembled, and bytes past the end of one value stay buffered for the
/// next call.
#[derive(Debug)]
pub struct Connection<S = TcpStream> {
    pub id: u64,
    stream: BufWriter<S>,
    buffer: BytesMut,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Connection {
            id: NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed),
            stream: BufWriter::new(stream),
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Read exactly one value.
    ///
    /// Returns `Ok(None)` if the peer closed the stream between values. A
    /// close in the middle of a value is `RespError::UnexpectedEof`.
    pub async fn read_value(&mut self) -> Result<Option<RespValue>, RespError> {
        loop {
            if let Some(value) = RespParser::parse(&mut self.buffer)? {
                return Ok(Some(value));
            }

            if self.stream.read_buf(&mut self.buffer).await? == 0 {
                return if self.buffer.is_empty() {
                    Ok(None)
                } else {
                    Err(RespError::UnexpectedEof)
                };
            }
        }
    }

    /// Encode `value` and flush it to the peer.
    pub async fn write_value(&mut self, value: &RespValue) -> io::Result<()> {
        self.stream.write_all(&value.serialize()).await?;
        self.stream.flush().await
    }
}
