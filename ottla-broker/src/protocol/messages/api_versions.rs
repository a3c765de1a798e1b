use crate::protocol::{
    API_VERSIONS, ErrorCode, VersionRange,
    layout::{Field, Record, impl_record_codec},
    messages::{ApiRequest, TaggedField},
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ApiVersionsRequest {
    pub client_software_name: String,
    pub client_software_version: String,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for ApiVersionsRequest {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new(
                "0,compact",
                |r: &Self| &r.client_software_name,
                |r: &mut Self| &mut r.client_software_name,
            ),
            Field::new(
                "1,compact",
                |r: &Self| &r.client_software_version,
                |r: &mut Self| &mut r.client_software_version,
            ),
            Field::new(
                "2,compact",
                |r: &Self| &r.tagged_fields,
                |r: &mut Self| &mut r.tagged_fields,
            ),
        ]
    }
}

impl ApiRequest for ApiVersionsRequest {
    type Response = ApiVersionsResponse;

    const API_KEY: i16 = API_VERSIONS;
    const VERSIONS: VersionRange = VersionRange { min: 0, max: 4 };
    // response header stays at v0, clients parse this response before they
    // know whether the broker speaks flexible headers
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ApiVersionsResponse {
    pub error_code: ErrorCode,
    pub api_keys: Vec<SupportedApi>,
    pub throttle_time_ms: i32,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for ApiVersionsResponse {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new(
                "0",
                |r: &Self| &r.error_code,
                |r: &mut Self| &mut r.error_code,
            ),
            Field::new(
                "1,compact",
                |r: &Self| &r.api_keys,
                |r: &mut Self| &mut r.api_keys,
            ),
            Field::new(
                "2",
                |r: &Self| &r.throttle_time_ms,
                |r: &mut Self| &mut r.throttle_time_ms,
            ),
            Field::new(
                "3,compact,nilable",
                |r: &Self| &r.tagged_fields,
                |r: &mut Self| &mut r.tagged_fields,
            ),
        ]
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SupportedApi {
    pub api_key: i16,
    pub min_version: i16,
    pub max_version: i16,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for SupportedApi {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new("0", |r: &Self| &r.api_key, |r: &mut Self| &mut r.api_key),
            Field::new(
                "1",
                |r: &Self| &r.min_version,
                |r: &mut Self| &mut r.min_version,
            ),
            Field::new(
                "2",
                |r: &Self| &r.max_version,
                |r: &mut Self| &mut r.max_version,
            ),
            Field::new(
                "3,compact,nilable",
                |r: &Self| &r.tagged_fields,
                |r: &mut Self| &mut r.tagged_fields,
            ),
        ]
    }
}

impl_record_codec!(ApiVersionsRequest, ApiVersionsResponse, SupportedApi);

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::*;
    use crate::protocol::{CodecOpts, Decode, Encode};

    #[test]
    fn request_roundtrip() {
        let request = ApiVersionsRequest {
            client_software_name: "ottla".into(),
            client_software_version: "0.1".into(),
            tagged_fields: Vec::new(),
        };

        let mut buf = BytesMut::new();
        request.encode(&mut buf, &CodecOpts::for_version(4)).unwrap();
        assert_eq!(
            &buf[..],
            [0x06, b'o', b't', b't', b'l', b'a', 0x04, b'0', b'.', b'1', 0x01]
        );

        let decoded =
            ApiVersionsRequest::decode(&mut buf, &CodecOpts::for_version(4)).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn response_body_layout() {
        let response = ApiVersionsResponse {
            error_code: ErrorCode::None,
            api_keys: vec![SupportedApi {
                api_key: 18,
                min_version: 0,
                max_version: 4,
                tagged_fields: Vec::new(),
            }],
            throttle_time_ms: 0,
            tagged_fields: Vec::new(),
        };

        let mut buf = BytesMut::new();
        response.encode(&mut buf, &CodecOpts::for_version(4)).unwrap();
        assert_eq!(
            &buf[..],
            [
                0x00, 0x00, // error code
                0x02, // one api key, compact
                0x00, 0x12, 0x00, 0x00, 0x00, 0x04, // key 18, versions 0..=4
                0x00, // nilable compact tagged fields, absent
                0x00, 0x00, 0x00, 0x00, // throttle
                0x00, // nilable compact tagged fields, absent
            ]
        );
    }
}
