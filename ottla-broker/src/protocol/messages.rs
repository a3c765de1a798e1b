use crate::protocol::{
    Decode, Encode, VersionRange, request,
    layout::{Field, Record, impl_record_codec},
};

mod api_versions;
pub use api_versions::{ApiVersionsRequest, ApiVersionsResponse, SupportedApi};

mod describe_topic_partitions;
pub use describe_topic_partitions::{
    Cursor, DescribeTopicPartitionsRequest, DescribeTopicPartitionsResponse, PartitionInfo,
    TopicPartitions, TopicRequest,
};

pub trait ApiRequest: Record + Decode {
    type Response: Record + Encode + Send + 'static;

    const API_KEY: i16;
    const VERSIONS: VersionRange;
    const REQUEST_HEADER_VERSION: i16 = request::REQUEST_HEADER_VERSION;
    const RESPONSE_HEADER_VERSION: i16 = 0;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaggedField {
    pub tag: u32,
    pub data: Vec<u8>,
}

impl Record for TaggedField {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new("0", |f: &Self| &f.tag, |f: &mut Self| &mut f.tag),
            Field::new("1", |f: &Self| &f.data, |f: &mut Self| &mut f.data),
        ]
    }
}

impl_record_codec!(TaggedField);
