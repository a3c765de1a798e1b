use uuid::Uuid;

use crate::protocol::{
    DESCRIBE_TOPIC_PARTITIONS, ErrorCode, VersionRange,
    layout::{Field, Record, impl_record_codec},
    messages::{ApiRequest, TaggedField},
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DescribeTopicPartitionsRequest {
    pub topics: Vec<TopicRequest>,
    pub response_partition_limit: i32,
    pub cursor: Option<Cursor>,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for DescribeTopicPartitionsRequest {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new(
                "0,compact",
                |r: &Self| &r.topics,
                |r: &mut Self| &mut r.topics,
            ),
            Field::new(
                "1",
                |r: &Self| &r.response_partition_limit,
                |r: &mut Self| &mut r.response_partition_limit,
            ),
            Field::new("2,nilable", |r: &Self| &r.cursor, |r: &mut Self| &mut r.cursor),
            Field::new(
                "3,compact,nilable",
                |r: &Self| &r.tagged_fields,
                |r: &mut Self| &mut r.tagged_fields,
            ),
        ]
    }
}

impl ApiRequest for DescribeTopicPartitionsRequest {
    type Response = DescribeTopicPartitionsResponse;

    const API_KEY: i16 = DESCRIBE_TOPIC_PARTITIONS;
    const VERSIONS: VersionRange = VersionRange { min: 0, max: 0 };
    const RESPONSE_HEADER_VERSION: i16 = 1;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TopicRequest {
    pub name: String,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for TopicRequest {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new("0,compact", |r: &Self| &r.name, |r: &mut Self| &mut r.name),
            Field::new(
                "1,compact",
                |r: &Self| &r.tagged_fields,
                |r: &mut Self| &mut r.tagged_fields,
            ),
        ]
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Cursor {
    pub topic_name: String,
    pub partition_index: i32,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for Cursor {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new(
                "0",
                |r: &Self| &r.topic_name,
                |r: &mut Self| &mut r.topic_name,
            ),
            Field::new(
                "1",
                |r: &Self| &r.partition_index,
                |r: &mut Self| &mut r.partition_index,
            ),
            Field::new(
                "2,compact,nilable",
                |r: &Self| &r.tagged_fields,
                |r: &mut Self| &mut r.tagged_fields,
            ),
        ]
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DescribeTopicPartitionsResponse {
    pub throttle_time_ms: i32,
    pub topics: Vec<TopicPartitions>,
    pub next_cursor: Option<Cursor>,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for DescribeTopicPartitionsResponse {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new(
                "1",
                |r: &Self| &r.throttle_time_ms,
                |r: &mut Self| &mut r.throttle_time_ms,
            ),
            Field::new(
                "2,compact",
                |r: &Self| &r.topics,
                |r: &mut Self| &mut r.topics,
            ),
            Field::new(
                "3,nilable",
                |r: &Self| &r.next_cursor,
                |r: &mut Self| &mut r.next_cursor,
            ),
            Field::new(
                "4,compact,nilable",
                |r: &Self| &r.tagged_fields,
                |r: &mut Self| &mut r.tagged_fields,
            ),
        ]
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TopicPartitions {
    pub error_code: ErrorCode,
    pub name: String,
    pub topic_id: Uuid,
    pub is_internal: bool,
    pub partitions: Vec<PartitionInfo>,
    pub authorized_operations: i32,
    pub tagged_fields: Vec<TaggedField>,
}

impl Record for TopicPartitions {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new(
                "0",
                |r: &Self| &r.error_code,
                |r: &mut Self| &mut r.error_code,
            ),
            Field::new("1,compact", |r: &Self| &r.name, |r: &mut Self| &mut r.name),
            Field::new(
                "2,raw",
                |r: &Self| &r.topic_id,
                |r: &mut Self| &mut r.topic_id,
            ),
            Field::new(
                "3",
                |r: &Self| &r.is_internal,
                |r: &mut Self| &mut r.is_internal,
            ),
            Field::new(
                "4,compact",
                |r: &Self| &r.partitions,
                |r: &mut Self| &mut r.partitions,
            ),
            Field::new(
                "5",
                |r: &Self| &r.authorized_operations,
                |r: &mut Self| &mut r.authorized_operations,
            ),
            Field::new(
                "6,compact,nilable",
                |r: &Self| &r.tagged_fields,
                |r: &mut Self| &mut r.tagged_fields,
            ),
        ]
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartitionInfo;

impl Record for PartitionInfo {
    fn fields() -> Vec<Field<Self>> {
        Vec::new()
    }
}

impl_record_codec!(
    DescribeTopicPartitionsRequest,
    TopicRequest,
    Cursor,
    DescribeTopicPartitionsResponse,
    TopicPartitions,
    PartitionInfo,
);
