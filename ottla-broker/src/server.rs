use std::{any::Any, io, panic::AssertUnwindSafe, sync::Arc};

use bytes::{Bytes, BytesMut};
use futures::{FutureExt, SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;
use tracing::{debug, error, info, warn};

use crate::{
    FrameCodec,
    protocol::{
        CodecError, CodecOpts, Encode, ErrorCode,
        handlers::HandlerContext,
        registry::MessageRegistry,
        request::Request,
        response::ResponseHeader,
    },
};

pub struct KafkaServer {
    registry: MessageRegistry,
}

impl KafkaServer {
    pub fn new(registry: MessageRegistry) -> Self {
        Self { registry }
    }

    pub async fn listen(self, addr: &str) -> io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> io::Result<()> {
        info!(addr = %listener.local_addr()?, "listening");
        let server = Arc::new(self);

        loop {
            let (stream, peer) = listener.accept().await?;
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                debug!(%peer, "connection open");
                server.serve_connection(stream).await;
                debug!(%peer, "connection closed");
            });
        }
    }

    async fn serve_connection(&self, stream: TcpStream) {
        let mut framed = Framed::new(stream, FrameCodec);

        while let Some(frame) = framed.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => {
                    debug!(error = %err, "framing error, closing connection");
                    return;
                }
            };

            let response = match self.dispatch(frame).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(error = %err, "could not answer request, closing connection");
                    return;
                }
            };

            if let Err(err) = framed.send(response).await {
                debug!(error = %err, "write failed, closing connection");
                return;
            }
        }
    }

    async fn dispatch(&self, frame: BytesMut) -> Result<Bytes, CodecError> {
        let Request { api, header, mut body } =
            Request::parse(frame, |key| self.registry.request_header_version(key))?;
        let correlation_id = header.correlation_id;

        let entry = match self.registry.entry(api.key) {
            Some(entry) if entry.versions.contains(api.version) => entry,
            _ => {
                debug!(api_key = api.key, api_version = api.version, "unsupported api");
                return error_response(correlation_id, 0, ErrorCode::UnsupportedVersion);
            }
        };

        let ctx = HandlerContext {
            version: api.version,
            registry: &self.registry,
        };
        let outcome = AssertUnwindSafe(entry.handler.handle(&mut body, &ctx))
            .catch_unwind()
            .await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(api_key = api.key, error = %err, "handler failed");
                return error_response(
                    correlation_id,
                    entry.response_header_version,
                    ErrorCode::UnknownServerError,
                );
            }
            Err(panic) => {
                error!(api_key = api.key, panic = panic_message(&panic), "handler panicked");
                return Err(CodecError::Io(io::Error::other("handler panicked")));
            }
        };

        let mut buf = BytesMut::new();
        ResponseHeader {
            correlation_id,
            tagged_fields: Vec::new(),
        }
        .encode(&mut buf, &CodecOpts::for_version(entry.response_header_version))?;
        response.encode_any(&mut buf, &CodecOpts::for_version(api.version))?;
        Ok(buf.freeze())
    }
}

fn error_response(
    correlation_id: i32,
    header_version: i16,
    code: ErrorCode,
) -> Result<Bytes, CodecError> {
    let mut buf = BytesMut::new();
    ResponseHeader {
        correlation_id,
        tagged_fields: Vec::new(),
    }
    .encode(&mut buf, &CodecOpts::for_version(header_version))?;
    code.encode(&mut buf, &CodecOpts::default())?;
    Ok(buf.freeze())
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("opaque panic payload")
}
