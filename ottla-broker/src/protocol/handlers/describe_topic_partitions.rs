use tracing::debug;
use uuid::Uuid;

use crate::protocol::{
    CodecError, ErrorCode,
    handlers::{HandlerContext, RequestHandler},
    messages::{DescribeTopicPartitionsRequest, DescribeTopicPartitionsResponse, TopicPartitions},
};

// READ through ALTER_CONFIGS
const DEFAULT_AUTHORIZED_OPERATIONS: i32 = 0b0000_1101_1111_1000;

pub struct DescribeTopicPartitionsHandler;

impl RequestHandler<DescribeTopicPartitionsRequest> for DescribeTopicPartitionsHandler {
    async fn handle(
        &self,
        request: DescribeTopicPartitionsRequest,
        _ctx: &HandlerContext<'_>,
    ) -> Result<DescribeTopicPartitionsResponse, CodecError> {
        debug!(
            topics = request.topics.len(),
            limit = request.response_partition_limit,
            "describing topic partitions"
        );

        let topics = request
            .topics
            .into_iter()
            .map(|topic| TopicPartitions {
                error_code: ErrorCode::UnknownTopic,
                name: topic.name,
                topic_id: Uuid::nil(),
                is_internal: false,
                partitions: Vec::new(),
                authorized_operations: DEFAULT_AUTHORIZED_OPERATIONS,
                tagged_fields: Vec::new(),
            })
            .collect();

        Ok(DescribeTopicPartitionsResponse {
            throttle_time_ms: 0,
            topics,
            next_cursor: None,
            tagged_fields: Vec::new(),
        })
    }
}
