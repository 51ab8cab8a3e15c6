use bytes::{Buf, BytesMut};
use std::fmt;
use std::io::{self, Cursor};

/// Largest bulk string payload the parser will accept (512 MiB).
pub const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;

/// Largest array element count the parser will accept.
pub const MAX_ARRAY_LEN: i64 = 1024 * 1024;

/// Elements reserved up front for an array; larger arrays grow as they fill.
const ARRAY_PREALLOC_LIMIT: i64 = 1024;

/// A protocol value. Used for both requests and replies.
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// +OK\r\n
    SimpleString(String),
    /// -ERR message\r\n
    Error(String),
    /// :1000\r\n
    Integer(i64),
    /// $6\r\nfoobar\r\n  or  $-1\r\n (null)
    BulkString(Option<Vec<u8>>),
    /// *2\r\n...  or  *-1\r\n (null)
    Array(Option<Vec<RespValue>>),
}

impl RespValue {
    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    pub fn simple_string(s: impl Into<String>) -> Self {
        RespValue::SimpleString(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        RespValue::Error(s.into())
    }

    pub fn integer(n: i64) -> Self {
        RespValue::Integer(n)
    }

    pub fn bulk_string(data: impl Into<Vec<u8>>) -> Self {
        RespValue::BulkString(Some(data.into()))
    }

    pub fn null_bulk_string() -> Self {
        RespValue::BulkString(None)
    }

    pub fn null_array() -> Self {
        RespValue::Array(None)
    }

    pub fn array(items: Vec<RespValue>) -> Self {
        RespValue::Array(Some(items))
    }

    /// True for the `$-1` and `*-1` sentinels.
    pub fn is_null(&self) -> bool {
        matches!(self, RespValue::BulkString(None) | RespValue::Array(None))
    }

    /// Serialize this value to wire bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_to(&mut buf);
        buf
    }

    /// Append the wire encoding of this value to `buf`.
    ///
    /// Simple strings and errors are written verbatim; the caller must not
    /// put CR or LF inside them.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            RespValue::SimpleString(s) => {
                buf.push(b'+');
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::Error(s) => {
                buf.push(b'-');
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::Integer(n) => {
                buf.push(b':');
                buf.extend_from_slice(n.to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::BulkString(None) => {
                buf.extend_from_slice(b"$-1\r\n");
            }
            RespValue::BulkString(Some(data)) => {
                buf.push(b'$');
                buf.extend_from_slice(data.len().to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
                buf.extend_from_slice(data);
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::Array(None) => {
                buf.extend_from_slice(b"*-1\r\n");
            }
            RespValue::Array(Some(items)) => {
                buf.push(b'*');
                buf.extend_from_slice(items.len().to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
                for item in items {
                    item.write_to(buf);
                }
            }
        }
    }

    /// Payload of a non-null bulk string.
    pub fn as_bulk(&self) -> Option<&[u8]> {
        match self {
            RespValue::BulkString(Some(data)) => Some(data),
            _ => None,
        }
    }

    /// Payload of a non-null bulk string as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> Option<String> {
        self.as_bulk()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

/// Human-readable rendering for console output. Never sent over the wire.
impl fmt::Display for RespValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespValue::SimpleString(s) | RespValue::Error(s) => f.write_str(s),
            RespValue::Integer(n) => write!(f, "{n}"),
            RespValue::BulkString(None) | RespValue::Array(None) => f.write_str("(nil)"),
            RespValue::BulkString(Some(data)) => f.write_str(&String::from_utf8_lossy(data)),
            RespValue::Array(Some(items)) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Streaming protocol parser.
///
/// Call `parse()` whenever more data has been appended to the buffer.
/// Returns `Ok(Some(value))` when a complete value is at the front of the
/// buffer, `Ok(None)` when more data is needed.
pub struct RespParser;

/// Internal parse outcome: either the buffer ran out or the data is bad.
enum ParseFailure {
    Incomplete,
    Invalid(RespError),
}

impl From<RespError> for ParseFailure {
    fn from(err: RespError) -> Self {
        ParseFailure::Invalid(err)
    }
}

type ParseResult<T> = Result<T, ParseFailure>;

impl RespParser {
    /// Try to parse one complete value from the front of `buf`.
    ///
    /// On success exactly the bytes of that value are consumed. On `Ok(None)`
    /// the buffer is left untouched.
    pub fn parse(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        let mut cursor = Cursor::new(&buf[..]);
        match Self::parse_value(&mut cursor) {
            Ok(value) => {
                let consumed = cursor.position() as usize;
                buf.advance(consumed);
                Ok(Some(value))
            }
            Err(ParseFailure::Incomplete) => Ok(None),
            Err(ParseFailure::Invalid(e)) => Err(e),
        }
    }

    fn parse_value(src: &mut Cursor<&[u8]>) -> ParseResult<RespValue> {
        if !src.has_remaining() {
            return Err(ParseFailure::Incomplete);
        }

        match src.get_u8() {
            b'+' => {
                let line = read_line(src)?;
                Ok(RespValue::SimpleString(String::from_utf8_lossy(line).into_owned()))
            }
            b'-' => {
                let line = read_line(src)?;
                Ok(RespValue::Error(String::from_utf8_lossy(line).into_owned()))
            }
            b':' => Self::parse_integer(src),
            b'$' => Self::parse_bulk_string(src),
            b'*' => Self::parse_array(src),
            other => Err(RespError::UnknownType(other).into()),
        }
    }

    fn parse_integer(src: &mut Cursor<&[u8]>) -> ParseResult<RespValue> {
        let line = read_line(src)?;
        let n = parse_decimal(line)
            .ok_or_else(|| invalid(format!("invalid integer: {}", String::from_utf8_lossy(line))))?;
        Ok(RespValue::Integer(n))
    }

    fn parse_bulk_string(src: &mut Cursor<&[u8]>) -> ParseResult<RespValue> {
        let line = read_line(src)?;
        let len = parse_decimal(line).ok_or_else(|| invalid("invalid bulk length"))?;

        if len == -1 {
            return Ok(RespValue::BulkString(None));
        }
        if !(0..=MAX_BULK_LEN).contains(&len) {
            return Err(invalid("invalid bulk length").into());
        }

        let len = len as usize;
        // payload + trailing \r\n
        if src.remaining() < len + 2 {
            return Err(ParseFailure::Incomplete);
        }

        let start = src.position() as usize;
        let bytes = *src.get_ref();
        if &bytes[start + len..start + len + 2] != b"\r\n" {
            return Err(invalid("missing CRLF after bulk string").into());
        }

        let data = bytes[start..start + len].to_vec();
        src.advance(len + 2);
        Ok(RespValue::BulkString(Some(data)))
    }

    fn parse_array(src: &mut Cursor<&[u8]>) -> ParseResult<RespValue> {
        let line = read_line(src)?;
        let len = parse_decimal(line).ok_or_else(|| invalid("invalid multibulk length"))?;

        if len == -1 {
            return Ok(RespValue::Array(None));
        }
        if !(0..=MAX_ARRAY_LEN).contains(&len) {
            return Err(invalid("invalid multibulk length").into());
        }

        let mut items = Vec::with_capacity(len.min(ARRAY_PREALLOC_LIMIT) as usize);
        for _ in 0..len {
            items.push(Self::parse_value(src)?);
        }

        Ok(RespValue::Array(Some(items)))
    }
}

/// Read up to and including the next LF. Trailing CRs are stripped from the
/// returned line.
fn read_line<'a>(src: &mut Cursor<&'a [u8]>) -> ParseResult<&'a [u8]> {
    let start = src.position() as usize;
    let bytes: &'a [u8] = *src.get_ref();

    let Some(offset) = bytes[start..].iter().position(|&b| b == b'\n') else {
        return Err(ParseFailure::Incomplete);
    };
    let end = start + offset;
    src.set_position((end + 1) as u64);

    let mut line = &bytes[start..end];
    while let [rest @ .., b'\r'] = line {
        line = rest;
    }
    Ok(line)
}

fn parse_decimal(line: &[u8]) -> Option<i64> {
    std::str::from_utf8(line).ok()?.parse().ok()
}

fn invalid(msg: impl Into<String>) -> RespError {
    RespError::InvalidData(msg.into())
}

#[derive(Debug, thiserror::Error)]
pub enum RespError {
    #[error("unknown data type '{}'", *.0 as char)]
    UnknownType(u8),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("stream ended in the middle of a value")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
