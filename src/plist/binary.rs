//! Binary (`bplist00`) property list reader.
//!
//! A binary list is a header, a run of serialized objects, an offset table
//! giving the position of each object and a 32-byte trailer. Containers hold
//! object references (indexes into the offset table) rather than nested
//! bytes. Only the object kinds shortcut extraction needs are decoded; the
//! rest read as [`Value::Other`].

use super::Value;
use crate::error::{Error, Result};

const HEADER_SIZE: usize = 8;
const TRAILER_SIZE: usize = 32;

/// Deepest container nesting accepted; also stops reference cycles.
const MAX_DEPTH: usize = 64;

const MARKER_INT: u8 = 0x1;
const MARKER_ASCII: u8 = 0x5;
const MARKER_UTF16: u8 = 0x6;
const MARKER_ARRAY: u8 = 0xA;
const MARKER_DICT: u8 = 0xD;

/// Low nibble meaning "the length follows as an integer object".
const LENGTH_FOLLOWS: u8 = 0x0F;

/// Reads the top object of a binary property list.
pub(super) fn read_root(data: &[u8]) -> Result<Value> {
    let reader = BinaryReader::new(data)?;
    reader.read_object(reader.trailer.root, 0)
}

#[derive(Debug, Clone, Copy)]
struct Trailer {
    /// Width of an offset table entry in bytes
    offset_size: usize,
    /// Width of an object reference in bytes
    ref_size: usize,
    object_count: usize,
    root: usize,
    offset_table: usize,
}

impl Trailer {
    fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE + TRAILER_SIZE {
            return Err(invalid("binary property list too small"));
        }

        let trailer = &data[data.len() - TRAILER_SIZE..];
        let trailer = Self {
            offset_size: usize::from(trailer[6]),
            ref_size: usize::from(trailer[7]),
            object_count: read_uint(&trailer[8..16])?,
            root: read_uint(&trailer[16..24])?,
            offset_table: read_uint(&trailer[24..32])?,
        };

        if !(1..=8).contains(&trailer.offset_size) || !(1..=8).contains(&trailer.ref_size) {
            return Err(invalid("bad integer width in binary property list trailer"));
        }
        if trailer.root >= trailer.object_count {
            return Err(invalid("binary property list root is out of range"));
        }

        let table_end = trailer
            .object_count
            .checked_mul(trailer.offset_size)
            .and_then(|size| size.checked_add(trailer.offset_table));
        match table_end {
            Some(end) if trailer.offset_table >= HEADER_SIZE && end <= data.len() - TRAILER_SIZE => {
                Ok(trailer)
            }
            _ => Err(invalid("binary property list offset table is out of range")),
        }
    }
}

struct BinaryReader<'a> {
    data: &'a [u8],
    trailer: Trailer,
}

impl<'a> BinaryReader<'a> {
    fn new(data: &'a [u8]) -> Result<Self> {
        Ok(Self {
            data,
            trailer: Trailer::parse(data)?,
        })
    }

    fn bytes(&self, start: usize, len: usize) -> Result<&'a [u8]> {
        start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| invalid("read past end of binary property list"))
    }

    /// Returns the byte offset of an object.
    fn offset(&self, object: usize) -> Result<usize> {
        if object >= self.trailer.object_count {
            return Err(invalid("object reference out of range"));
        }
        let entry = self.trailer.offset_table + object * self.trailer.offset_size;
        read_uint(self.bytes(entry, self.trailer.offset_size)?)
    }

    fn read_object(&self, object: usize, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(invalid("binary property list nested too deeply"));
        }

        let offset = self.offset(object)?;
        let marker = self.bytes(offset, 1)?[0];
        let (kind, info) = (marker >> 4, marker & 0x0F);

        match kind {
            MARKER_ASCII => {
                let (len, start) = self.length(offset, info)?;
                let bytes = self.bytes(start, len)?;
                Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()))
            }
            MARKER_UTF16 => {
                let (len, start) = self.length(offset, info)?;
                let size = len
                    .checked_mul(2)
                    .ok_or_else(|| invalid("string length out of range"))?;
                let units: Vec<u16> = self
                    .bytes(start, size)?
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units)
                    .map(Value::String)
                    .map_err(|_| invalid("malformed UTF-16 string"))
            }
            MARKER_ARRAY => {
                let (count, start) = self.length(offset, info)?;
                let items = self
                    .refs(start, count)?
                    .into_iter()
                    .map(|item| self.read_object(item, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(items))
            }
            MARKER_DICT => {
                let (count, start) = self.length(offset, info)?;
                let keys = self.refs(start, count)?;
                let values = self.refs(start + count * self.trailer.ref_size, count)?;

                let mut entries = Vec::with_capacity(count);
                for (key, value) in keys.into_iter().zip(values) {
                    // Keys are strings in any list Apple writes
                    if let Value::String(key) = self.read_object(key, depth + 1)? {
                        entries.push((key, self.read_object(value, depth + 1)?));
                    }
                }
                Ok(Value::Dict(entries))
            }
            _ => Ok(Value::Other),
        }
    }

    /// Returns an object's element count and the offset of its payload.
    fn length(&self, offset: usize, info: u8) -> Result<(usize, usize)> {
        if info != LENGTH_FOLLOWS {
            return Ok((usize::from(info), offset + 1));
        }

        let marker = self.bytes(offset + 1, 1)?[0];
        if marker >> 4 != MARKER_INT || marker & 0x0F > 3 {
            return Err(invalid("bad length marker in binary property list"));
        }
        let size = 1usize << (marker & 0x0F);
        let len = read_uint(self.bytes(offset + 2, size)?)?;
        Ok((len, offset + 2 + size))
    }

    fn refs(&self, start: usize, count: usize) -> Result<Vec<usize>> {
        let size = count
            .checked_mul(self.trailer.ref_size)
            .ok_or_else(|| invalid("object count out of range"))?;
        self.bytes(start, size)?
            .chunks_exact(self.trailer.ref_size)
            .map(read_uint)
            .collect()
    }
}

/// Reads a big-endian unsigned integer of up to eight bytes.
fn read_uint(bytes: &[u8]) -> Result<usize> {
    let value = bytes
        .iter()
        .fold(0u64, |value, &byte| (value << 8) | u64::from(byte));
    usize::try_from(value).map_err(|_| invalid("integer out of range"))
}

fn invalid(message: &str) -> Error {
    Error::InvalidData(message.to_string())
}
