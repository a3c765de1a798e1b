use bytes::BytesMut;

use crate::protocol::{
    CodecError, CodecOpts, Decode,
    layout::{Field, Record, impl_record_codec},
    messages::TaggedField,
};

pub const REQUEST_HEADER_VERSION: i16 = 2;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RequestApi {
    pub key: i16,
    pub version: i16,
}

impl Record for RequestApi {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new("0", |api: &Self| &api.key, |api: &mut Self| &mut api.key),
            Field::new(
                "1",
                |api: &Self| &api.version,
                |api: &mut Self| &mut api.version,
            ),
        ]
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RequestHeader {
    pub correlation_id: i32,
    pub client_id: String,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for RequestHeader {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new(
                "0",
                |h: &Self| &h.correlation_id,
                |h: &mut Self| &mut h.correlation_id,
            ),
            Field::new(
                "1,nilable,minVersion=1",
                |h: &Self| &h.client_id,
                |h: &mut Self| &mut h.client_id,
            ),
            Field::new(
                "2,compact,minVersion=2",
                |h: &Self| &h.tagged_fields,
                |h: &mut Self| &mut h.tagged_fields,
            ),
        ]
    }
}

impl_record_codec!(RequestApi, RequestHeader);

#[derive(Debug)]
pub struct Request {
    pub api: RequestApi,
    pub header: RequestHeader,
    pub body: BytesMut,
}

impl Request {
    pub fn parse(
        mut frame: BytesMut,
        header_version_for: impl FnOnce(i16) -> i16,
    ) -> Result<Self, CodecError> {
        let api = RequestApi::decode(&mut frame, &CodecOpts::for_version(0))?;
        let header_version = header_version_for(api.key);
        let header = RequestHeader::decode(&mut frame, &CodecOpts::for_version(header_version))?;

        Ok(Self {
            api,
            header,
            body: frame,
        })
    }
}
