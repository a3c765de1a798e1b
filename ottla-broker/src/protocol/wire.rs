use bytes::{Buf, BytesMut};

use crate::protocol::CodecError;

fn ensure(buf: &BytesMut, needed: usize) -> Result<(), CodecError> {
    if buf.len() < needed {
        return Err(CodecError::ShortRead {
            needed: needed - buf.len(),
        });
    }
    Ok(())
}

pub fn get_u8(buf: &mut BytesMut) -> Result<u8, CodecError> {
    ensure(buf, 1)?;
    Ok(buf.get_u8())
}

pub fn get_i16(buf: &mut BytesMut) -> Result<i16, CodecError> {
    ensure(buf, 2)?;
    Ok(buf.get_i16())
}

pub fn get_i32(buf: &mut BytesMut) -> Result<i32, CodecError> {
    ensure(buf, 4)?;
    Ok(buf.get_i32())
}

pub fn get_u32(buf: &mut BytesMut) -> Result<u32, CodecError> {
    ensure(buf, 4)?;
    Ok(buf.get_u32())
}

pub fn get_bytes(buf: &mut BytesMut, len: usize) -> Result<BytesMut, CodecError> {
    ensure(buf, len)?;
    Ok(buf.split_to(len))
}

pub fn get_string(buf: &mut BytesMut, len: usize) -> Result<String, CodecError> {
    let raw = get_bytes(buf, len)?;
    Ok(String::from_utf8(raw.to_vec())?)
}
