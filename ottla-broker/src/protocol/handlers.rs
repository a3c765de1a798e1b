use std::marker::PhantomData;

use async_trait::async_trait;
use bytes::BytesMut;

use crate::protocol::{
    CodecError, CodecOpts,
    messages::ApiRequest,
    registry::MessageRegistry,
    response::AnyResponse,
};

mod api_versions;
pub use api_versions::ApiVersionsHandler;

mod describe_topic_partitions;
pub use describe_topic_partitions::DescribeTopicPartitionsHandler;

pub struct HandlerContext<'a> {
    pub version: i16,
    pub registry: &'a MessageRegistry,
}

pub trait RequestHandler<Req: ApiRequest>: Send + Sync {
    fn handle(
        &self,
        request: Req,
        ctx: &HandlerContext<'_>,
    ) -> impl Future<Output = Result<Req::Response, CodecError>> + Send;
}

#[async_trait]
pub(crate) trait AnyRequestHandler: Send + Sync {
    async fn handle(
        &self,
        body: &mut BytesMut,
        ctx: &HandlerContext<'_>,
    ) -> Result<Box<dyn AnyResponse>, CodecError>;
}

pub(crate) struct TypedRequestHandler<Req: ApiRequest, H: RequestHandler<Req>> {
    handler: H,
    _request: PhantomData<Req>,
}

impl<Req: ApiRequest, H: RequestHandler<Req>> TypedRequestHandler<Req, H> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _request: PhantomData,
        }
    }
}

#[async_trait]
impl<Req, H> AnyRequestHandler for TypedRequestHandler<Req, H>
where
    Req: ApiRequest,
    H: RequestHandler<Req>,
{
    async fn handle(
        &self,
        body: &mut BytesMut,
        ctx: &HandlerContext<'_>,
    ) -> Result<Box<dyn AnyResponse>, CodecError> {
        let request = Req::decode(body, &CodecOpts::for_version(ctx.version))?;
        let response = self.handler.handle(request, ctx).await?;
        Ok(Box::new(response))
    }
}
