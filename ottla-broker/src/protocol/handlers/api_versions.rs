use tracing::debug;

use crate::protocol::{
    CodecError, ErrorCode,
    handlers::{HandlerContext, RequestHandler},
    messages::{ApiVersionsRequest, ApiVersionsResponse, SupportedApi},
};

pub struct ApiVersionsHandler;

impl RequestHandler<ApiVersionsRequest> for ApiVersionsHandler {
    async fn handle(
        &self,
        request: ApiVersionsRequest,
        ctx: &HandlerContext<'_>,
    ) -> Result<ApiVersionsResponse, CodecError> {
        debug!(
            client = %request.client_software_name,
            client_version = %request.client_software_version,
            "answering api_versions"
        );

        let api_keys = ctx
            .registry
            .supported_apis()
            .into_iter()
            .map(|(api_key, versions)| SupportedApi {
                api_key,
                min_version: versions.min,
                max_version: versions.max,
                tagged_fields: Vec::new(),
            })
            .collect();

        Ok(ApiVersionsResponse {
            error_code: ErrorCode::None,
            api_keys,
            throttle_time_ms: 0,
            tagged_fields: Vec::new(),
        })
    }
}
