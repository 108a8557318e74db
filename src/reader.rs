use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::DecodeError;

pub const MAX_VARINT_BYTES: usize = 10;

pub(crate) struct ProtoBufReader<'a> {
    cur: Cursor<&'a [u8]>,
    checkpoint: u64,
}

impl<'a> ProtoBufReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self {
            cur: Cursor::new(buf),
            checkpoint: 0,
        }
    }

    pub(crate) fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let mut res: u64 = 0;

        for i in 0..MAX_VARINT_BYTES {
            let byte = self.cur.read_u8()?;
            res |= u64::from(byte & 0x7f) << (i * 7);
            if byte < 0x80 {
                return Ok(res);
            }
        }
        Err(DecodeError::VarintOverflow)
    }

    pub(crate) fn read_fixed32(&mut self) -> Result<u32, DecodeError> {
        Ok(self.cur.read_u32::<LittleEndian>()?)
    }

    pub(crate) fn read_fixed64(&mut self) -> Result<u64, DecodeError> {
        Ok(self.cur.read_u64::<LittleEndian>()?)
    }

    /// Reads a length prefix and the payload it covers.
    pub(crate) fn read_delimited(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varint()?;
        let remaining = self.remaining_bytes();
        if len > remaining.len() as u64 {
            return Err(DecodeError::LengthOverflow {
                len,
                remaining: remaining.len(),
            });
        }
        let payload = &remaining[..len as usize];
        self.cur.set_position(self.cur.position() + len);
        Ok(payload)
    }

    pub(crate) fn pos(&self) -> usize {
        self.cur.position() as usize
    }

    pub(crate) fn checkpoint(&mut self) {
        self.checkpoint = self.cur.position()
    }

    pub(crate) fn reset_checkpoint(&mut self) {
        self.cur.set_position(self.checkpoint)
    }

    pub(crate) fn remaining_bytes(&self) -> &'a [u8] {
        let buf: &'a [u8] = *self.cur.get_ref();
        &buf[(self.cur.position() as usize).min(buf.len())..]
    }
}
