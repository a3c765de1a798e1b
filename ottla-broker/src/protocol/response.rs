use bytes::BytesMut;

use crate::protocol::{
    CodecError, CodecOpts, Encode,
    layout::{Field, Record, impl_record_codec},
    messages::TaggedField,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResponseHeader {
    pub correlation_id: i32,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for ResponseHeader {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new(
                "0",
                |h: &Self| &h.correlation_id,
                |h: &mut Self| &mut h.correlation_id,
            ),
            Field::new(
                "1,minVersion=1,compact,nilable",
                |h: &Self| &h.tagged_fields,
                |h: &mut Self| &mut h.tagged_fields,
            ),
        ]
    }
}

impl_record_codec!(ResponseHeader);

pub trait AnyResponse: Send {
    fn encode_any(&self, buf: &mut BytesMut, opts: &CodecOpts) -> Result<(), CodecError>;
}

impl<T: Encode + Send> AnyResponse for T {
    fn encode_any(&self, buf: &mut BytesMut, opts: &CodecOpts) -> Result<(), CodecError> {
        self.encode(buf, opts)
    }
}
