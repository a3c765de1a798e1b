use std::array;

use bytes::{BufMut, BytesMut};
use uuid::Uuid;

use crate::protocol::{CodecError, CodecOpts, Decode, Encode, wire};

impl Encode for u8 {
    fn encode(&self, buf: &mut BytesMut, _opts: &CodecOpts) -> Result<(), CodecError> {
        buf.put_u8(*self);
        Ok(())
    }
}

impl Decode for u8 {
    fn decode(buf: &mut BytesMut, _opts: &CodecOpts) -> Result<Self, CodecError> {
        wire::get_u8(buf)
    }
}

impl Encode for i16 {
    fn encode(&self, buf: &mut BytesMut, _opts: &CodecOpts) -> Result<(), CodecError> {
        buf.put_i16(*self);
        Ok(())
    }
}

impl Decode for i16 {
    fn decode(buf: &mut BytesMut, _opts: &CodecOpts) -> Result<Self, CodecError> {
        wire::get_i16(buf)
    }
}

impl Encode for i32 {
    fn encode(&self, buf: &mut BytesMut, _opts: &CodecOpts) -> Result<(), CodecError> {
        buf.put_i32(*self);
        Ok(())
    }
}

impl Decode for i32 {
    fn decode(buf: &mut BytesMut, _opts: &CodecOpts) -> Result<Self, CodecError> {
        wire::get_i32(buf)
    }
}

impl Encode for u32 {
    fn encode(&self, buf: &mut BytesMut, _opts: &CodecOpts) -> Result<(), CodecError> {
        buf.put_u32(*self);
        Ok(())
    }
}

impl Decode for u32 {
    fn decode(buf: &mut BytesMut, _opts: &CodecOpts) -> Result<Self, CodecError> {
        wire::get_u32(buf)
    }
}

impl Encode for bool {
    fn encode(&self, buf: &mut BytesMut, _opts: &CodecOpts) -> Result<(), CodecError> {
        buf.put_u8(if *self { 1 } else { 0 });
        Ok(())
    }
}

impl Decode for bool {
    fn decode(buf: &mut BytesMut, _opts: &CodecOpts) -> Result<Self, CodecError> {
        match wire::get_u8(buf)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }
}

impl Encode for String {
    fn encode(&self, buf: &mut BytesMut, opts: &CodecOpts) -> Result<(), CodecError> {
        let bytes = self.as_bytes();
        match (opts.compact, opts.nilable, bytes.is_empty()) {
            (true, true, true) => buf.put_u8(0),
            (false, true, true) => buf.put_i16(-1),
            (true, _, _) => {
                let prefix = u8::try_from(bytes.len() + 1)
                    .map_err(|_| CodecError::LengthOverflow(bytes.len()))?;
                buf.put_u8(prefix);
                buf.put_slice(bytes);
            }
            (false, _, _) => {
                let len = i16::try_from(bytes.len())
                    .map_err(|_| CodecError::LengthOverflow(bytes.len()))?;
                buf.put_i16(len);
                buf.put_slice(bytes);
            }
        }
        Ok(())
    }
}

impl Decode for String {
    fn decode(buf: &mut BytesMut, opts: &CodecOpts) -> Result<Self, CodecError> {
        let len = if opts.compact {
            i32::from(wire::get_u8(buf)?) - 1
        } else {
            i32::from(wire::get_i16(buf)?)
        };

        if len <= 0 {
            return Ok(String::new());
        }

        wire::get_string(buf, len as usize)
    }
}

fn get_array_len(buf: &mut BytesMut, compact: bool) -> Result<i32, CodecError> {
    if compact {
        Ok(i32::from(wire::get_u8(buf)?) - 1)
    } else {
        wire::get_i32(buf)
    }
}

fn put_array_len(buf: &mut BytesMut, compact: bool, len: usize) -> Result<(), CodecError> {
    if compact {
        let prefix = u8::try_from(len + 1).map_err(|_| CodecError::LengthOverflow(len))?;
        buf.put_u8(prefix);
    } else {
        let len = i32::try_from(len).map_err(|_| CodecError::LengthOverflow(len))?;
        buf.put_i32(len);
    }
    Ok(())
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, buf: &mut BytesMut, opts: &CodecOpts) -> Result<(), CodecError> {
        if opts.raw {
            return Err(CodecError::RawVariableArray);
        }

        match (opts.compact, opts.nilable, self.is_empty()) {
            (true, true, true) => {
                buf.put_u8(0);
                return Ok(());
            }
            (false, true, true) => {
                buf.put_i32(-1);
                return Ok(());
            }
            _ => put_array_len(buf, opts.compact, self.len())?,
        }

        for element in self {
            element.encode(buf, opts)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(buf: &mut BytesMut, opts: &CodecOpts) -> Result<Self, CodecError> {
        if opts.raw {
            return Err(CodecError::RawVariableArray);
        }

        let len = get_array_len(buf, opts.compact)?;
        if len <= 0 {
            return Ok(Vec::new());
        }

        let mut elements = Vec::with_capacity((len as usize).min(buf.len()));
        for _ in 0..len {
            elements.push(T::decode(buf, opts)?);
        }
        Ok(elements)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, buf: &mut BytesMut, opts: &CodecOpts) -> Result<(), CodecError> {
        if !opts.raw {
            put_array_len(buf, opts.compact, N)?;
        }
        for element in self {
            element.encode(buf, opts)?;
        }
        Ok(())
    }
}

impl<T: Decode + Default, const N: usize> Decode for [T; N] {
    fn decode(buf: &mut BytesMut, opts: &CodecOpts) -> Result<Self, CodecError> {
        let len = if opts.raw {
            N as i32
        } else {
            get_array_len(buf, opts.compact)?
        };

        let mut elements = array::from_fn(|_| T::default());
        if len < 0 {
            return Ok(elements);
        }
        if len as usize > N {
            return Err(CodecError::FixedArrayOverflow {
                got: len as usize,
                capacity: N,
            });
        }

        for slot in elements.iter_mut().take(len as usize) {
            *slot = T::decode(buf, opts)?;
        }
        Ok(elements)
    }
}

// topic ids travel as 16 raw bytes
impl Encode for Uuid {
    fn encode(&self, buf: &mut BytesMut, _opts: &CodecOpts) -> Result<(), CodecError> {
        buf.put_slice(self.as_bytes());
        Ok(())
    }
}

impl Decode for Uuid {
    fn decode(buf: &mut BytesMut, _opts: &CodecOpts) -> Result<Self, CodecError> {
        let raw = wire::get_bytes(buf, 16)?;
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&raw);
        Ok(Uuid::from_bytes(bytes))
    }
}
