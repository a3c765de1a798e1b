use anyhow::{Context, bail};
use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use ottla_broker::{
    FrameCodec,
    protocol::{
        API_VERSIONS, CodecOpts, Decode, Encode, ErrorCode,
        messages::{ApiVersionsRequest, ApiVersionsResponse},
        request::{REQUEST_HEADER_VERSION, RequestApi, RequestHeader},
        response::ResponseHeader,
    },
};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:9092".to_owned());

    let stream = TcpStream::connect(&addr)
        .await
        .with_context(|| format!("connecting to {addr}"))?;
    let mut framed = Framed::new(stream, FrameCodec);

    let mut frame = BytesMut::new();
    RequestApi {
        key: API_VERSIONS,
        version: 4,
    }
    .encode(&mut frame, &CodecOpts::for_version(0))?;
    RequestHeader {
        correlation_id: 1,
        client_id: "ottla-client".to_owned(),
        tagged_fields: Vec::new(),
    }
    .encode(&mut frame, &CodecOpts::for_version(REQUEST_HEADER_VERSION))?;
    ApiVersionsRequest {
        client_software_name: "ottla".to_owned(),
        client_software_version: env!("CARGO_PKG_VERSION").to_owned(),
        tagged_fields: Vec::new(),
    }
    .encode(&mut frame, &CodecOpts::for_version(4))?;
    framed.send(frame.freeze()).await?;

    let mut response = framed
        .next()
        .await
        .context("server closed the connection")??;

    let header = ResponseHeader::decode(&mut response, &CodecOpts::for_version(0))?;
    let body = ApiVersionsResponse::decode(&mut response, &CodecOpts::for_version(4))?;

    if body.error_code != ErrorCode::None {
        bail!("broker answered with error code {:?}", body.error_code);
    }

    println!("broker at {addr} (correlation id {})", header.correlation_id);
    println!("supported apis:");
    for api in body.api_keys {
        println!(
            "  {:>3}: versions {}..={}",
            api.api_key, api.min_version, api.max_version
        );
    }

    Ok(())
}
