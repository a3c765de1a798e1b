use std::net::SocketAddr;

use bytes::{Bytes, BytesMut};
use futures::{SinkExt, StreamExt};
use ottla_broker::{
    FrameCodec,
    protocol::{
        API_VERSIONS, CodecOpts, DESCRIBE_TOPIC_PARTITIONS, Decode, Encode, ErrorCode,
        handlers::{ApiVersionsHandler, DescribeTopicPartitionsHandler},
        messages::{
            ApiVersionsRequest, ApiVersionsResponse, DescribeTopicPartitionsRequest,
            DescribeTopicPartitionsResponse, TopicRequest,
        },
        registry::MessageRegistry,
        request::{RequestApi, RequestHeader},
        response::ResponseHeader,
    },
    server::KafkaServer,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tokio_util::codec::Framed;

async fn start_broker() -> SocketAddr {
    let registry = MessageRegistry::new();
    registry.register::<ApiVersionsRequest, _>(ApiVersionsHandler);
    registry.register::<DescribeTopicPartitionsRequest, _>(DescribeTopicPartitionsHandler);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(KafkaServer::new(registry).serve(listener));
    addr
}

fn request_prelude(api_key: i16, api_version: i16, correlation_id: i32) -> BytesMut {
    let mut frame = BytesMut::new();
    RequestApi {
        key: api_key,
        version: api_version,
    }
    .encode(&mut frame, &CodecOpts::for_version(0))
    .unwrap();
    RequestHeader {
        correlation_id,
        client_id: "test/9.0".to_owned(),
        tagged_fields: Vec::new(),
    }
    .encode(&mut frame, &CodecOpts::for_version(2))
    .unwrap();
    frame
}

fn api_versions_frame(api_version: i16, correlation_id: i32) -> Bytes {
    let mut frame = request_prelude(API_VERSIONS, api_version, correlation_id);
    ApiVersionsRequest {
        client_software_name: "ottla-tests".to_owned(),
        client_software_version: "9.0".to_owned(),
        tagged_fields: Vec::new(),
    }
    .encode(&mut frame, &CodecOpts::for_version(api_version))
    .unwrap();
    frame.freeze()
}

#[tokio::test]
async fn api_versions_advertises_every_registered_api() {
    let addr = start_broker().await;
    let stream = TcpStream::connect(addr).await.unwrap();
    let mut framed = Framed::new(stream, FrameCodec);

    framed.send(api_versions_frame(4, 42)).await.unwrap();

    let mut response = framed.next().await.unwrap().unwrap();
    let header = ResponseHeader::decode(&mut response, &CodecOpts::for_version(0)).unwrap();
    assert_eq!(header.correlation_id, 42);

    let body = ApiVersionsResponse::decode(&mut response, &CodecOpts::for_version(4)).unwrap();
    assert!(response.is_empty());
    assert_eq!(body.error_code, ErrorCode::None);
    assert_eq!(body.throttle_time_ms, 0);

    let keys: Vec<i16> = body.api_keys.iter().map(|api| api.api_key).collect();
    assert_eq!(keys, [API_VERSIONS, DESCRIBE_TOPIC_PARTITIONS]);
    let api_versions = &body.api_keys[0];
    assert_eq!((api_versions.min_version, api_versions.max_version), (0, 4));
}

#[tokio::test]
async fn outer_length_matches_the_payload() {
    let addr = start_broker().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let frame = api_versions_frame(4, 0x7fffffff);
    let mut wire = BytesMut::new();
    wire.extend_from_slice(&(frame.len() as i32).to_be_bytes());
    wire.extend_from_slice(&frame);
    stream.write_all(&wire).await.unwrap();

    let size = stream.read_i32().await.unwrap();
    assert!(size > 0);
    let mut payload = vec![0u8; size as usize];
    stream.read_exact(&mut payload).await.unwrap();

    // correlation id leads the payload, echoed from the request
    assert_eq!(&payload[..4], [0x7f, 0xff, 0xff, 0xff]);

    // no trailing bytes beyond the declared size
    stream.shutdown().await.unwrap();
    let mut rest = Vec::new();
    stream.read_to_end(&mut rest).await.unwrap();
    assert!(rest.is_empty());
}

#[tokio::test]
async fn unsupported_version_gets_the_error_code_and_keeps_the_connection() {
    let addr = start_broker().await;
    let stream = TcpStream::connect(addr).await.unwrap();
    let mut framed = Framed::new(stream, FrameCodec);

    framed.send(api_versions_frame(9, 7)).await.unwrap();

    let mut response = framed.next().await.unwrap().unwrap();
    let header = ResponseHeader::decode(&mut response, &CodecOpts::for_version(0)).unwrap();
    assert_eq!(header.correlation_id, 7);
    let code = ErrorCode::decode(&mut response, &CodecOpts::default()).unwrap();
    assert_eq!(code, ErrorCode::UnsupportedVersion);
    assert!(response.is_empty());

    // the connection survives a version miss
    framed.send(api_versions_frame(4, 8)).await.unwrap();
    let mut response = framed.next().await.unwrap().unwrap();
    let header = ResponseHeader::decode(&mut response, &CodecOpts::for_version(0)).unwrap();
    assert_eq!(header.correlation_id, 8);
}

#[tokio::test]
async fn unknown_api_key_is_rejected_like_a_version_miss() {
    let addr = start_broker().await;
    let stream = TcpStream::connect(addr).await.unwrap();
    let mut framed = Framed::new(stream, FrameCodec);

    framed.send(request_prelude(999, 0, 11).freeze()).await.unwrap();

    let mut response = framed.next().await.unwrap().unwrap();
    let header = ResponseHeader::decode(&mut response, &CodecOpts::for_version(0)).unwrap();
    assert_eq!(header.correlation_id, 11);
    let code = ErrorCode::decode(&mut response, &CodecOpts::default()).unwrap();
    assert_eq!(code, ErrorCode::UnsupportedVersion);
}

#[tokio::test]
async fn unknown_topics_are_echoed_with_the_error_code() {
    let addr = start_broker().await;
    let stream = TcpStream::connect(addr).await.unwrap();
    let mut framed = Framed::new(stream, FrameCodec);

    let mut frame = request_prelude(DESCRIBE_TOPIC_PARTITIONS, 0, 23);
    DescribeTopicPartitionsRequest {
        topics: vec![TopicRequest {
            name: "missing-topic".to_owned(),
            tagged_fields: Vec::new(),
        }],
        response_partition_limit: 100,
        cursor: None,
        tagged_fields: Vec::new(),
    }
    .encode(&mut frame, &CodecOpts::for_version(0))
    .unwrap();
    framed.send(frame.freeze()).await.unwrap();

    let mut response = framed.next().await.unwrap().unwrap();
    // DescribeTopicPartitions responses carry the v1 header
    let header = ResponseHeader::decode(&mut response, &CodecOpts::for_version(1)).unwrap();
    assert_eq!(header.correlation_id, 23);

    let body =
        DescribeTopicPartitionsResponse::decode(&mut response, &CodecOpts::for_version(0))
            .unwrap();
    assert!(response.is_empty());
    assert_eq!(body.topics.len(), 1);
    let topic = &body.topics[0];
    assert_eq!(topic.error_code, ErrorCode::UnknownTopic);
    assert_eq!(topic.name, "missing-topic");
    assert!(topic.topic_id.is_nil());
    assert!(topic.partitions.is_empty());
    assert_eq!(body.next_cursor, None);
}

#[tokio::test]
async fn negative_frame_size_closes_the_connection() {
    let addr = start_broker().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream.write_all(&(-1i32).to_be_bytes()).await.unwrap();

    let mut rest = Vec::new();
    stream.read_to_end(&mut rest).await.unwrap();
    assert!(rest.is_empty());
}

#[tokio::test]
async fn garbled_header_closes_the_connection() {
    let addr = start_broker().await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    // declared size 2: too short to hold even the api tuple
    stream
        .write_all(&[0x00, 0x00, 0x00, 0x02, 0x00, 0x12])
        .await
        .unwrap();

    let mut rest = Vec::new();
    stream.read_to_end(&mut rest).await.unwrap();
    assert!(rest.is_empty());
}
