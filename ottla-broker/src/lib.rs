use std::io;

use bytes::{Buf, BufMut, Bytes, BytesMut};

pub mod config;
pub mod protocol;
pub mod server;

pub struct FrameCodec;

impl tokio_util::codec::Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>, io::Error> {
        if src.len() < 4 {
            return Ok(None);
        }

        let size = i32::from_be_bytes(src[..4].try_into().expect("four bytes"));
        if size < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("negative frame size {size}"),
            ));
        }

        let size = size as usize;
        if src.len() - 4 < size {
            return Ok(None);
        }

        src.advance(4);
        Ok(Some(src.split_to(size)))
    }
}

impl tokio_util::codec::Encoder<Bytes> for FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, frame: Bytes, dst: &mut BytesMut) -> Result<(), io::Error> {
        dst.put_i32(frame.len() as i32);
        dst.put(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::codec::{Decoder, Encoder};

    use super::*;

    #[test]
    fn waits_for_a_complete_frame() {
        let mut codec = FrameCodec;
        let mut src = BytesMut::from(&[0x00, 0x00, 0x00, 0x05, 0x01, 0x02][..]);

        assert!(codec.decode(&mut src).unwrap().is_none());

        src.extend_from_slice(&[0x03, 0x04, 0x05]);
        let frame = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(&frame[..], [0x01, 0x02, 0x03, 0x04, 0x05]);
        assert!(src.is_empty());
    }

    #[test]
    fn negative_size_is_an_error() {
        let mut codec = FrameCodec;
        let mut src = BytesMut::from(&[0xff, 0xff, 0xff, 0xff][..]);
        assert!(codec.decode(&mut src).is_err());
    }

    #[test]
    fn encoder_prefixes_the_length() {
        let mut codec = FrameCodec;
        let mut dst = BytesMut::new();
        codec
            .encode(Bytes::from_static(&[0xaa, 0xbb]), &mut dst)
            .unwrap();
        assert_eq!(&dst[..], [0x00, 0x00, 0x00, 0x02, 0xaa, 0xbb]);
    }
}
