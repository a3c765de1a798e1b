use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use crate::protocol::{
    VersionRange,
    handlers::{AnyRequestHandler, RequestHandler, TypedRequestHandler},
    messages::ApiRequest,
    request::REQUEST_HEADER_VERSION,
};

pub struct MessageRegistry {
    handlers: RwLock<BTreeMap<i16, RegisteredApi>>,
}

#[derive(Clone)]
pub(crate) struct RegisteredApi {
    pub(crate) versions: VersionRange,
    pub(crate) request_header_version: i16,
    pub(crate) response_header_version: i16,
    pub(crate) handler: Arc<dyn AnyRequestHandler>,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn register<Req, H>(&self, handler: H)
    where
        Req: ApiRequest,
        H: RequestHandler<Req> + 'static,
    {
        let mut handlers = self.handlers.write().expect("registry lock poisoned");

        if let Some(existing) = handlers.get(&Req::API_KEY) {
            panic!(
                "api key {} is already registered for versions [{}, {}]",
                Req::API_KEY,
                existing.versions.min,
                existing.versions.max,
            );
        }

        handlers.insert(
            Req::API_KEY,
            RegisteredApi {
                versions: Req::VERSIONS,
                request_header_version: Req::REQUEST_HEADER_VERSION,
                response_header_version: Req::RESPONSE_HEADER_VERSION,
                handler: Arc::new(TypedRequestHandler::new(handler)),
            },
        );
    }

    pub(crate) fn entry(&self, api_key: i16) -> Option<RegisteredApi> {
        self.handlers
            .read()
            .expect("registry lock poisoned")
            .get(&api_key)
            .cloned()
    }

    // unknown apis fall back to the default so the correlation id can
    // still be recovered for the error response
    pub fn request_header_version(&self, api_key: i16) -> i16 {
        self.handlers
            .read()
            .expect("registry lock poisoned")
            .get(&api_key)
            .map_or(REQUEST_HEADER_VERSION, |entry| entry.request_header_version)
    }

    pub fn supported_apis(&self) -> Vec<(i16, VersionRange)> {
        self.handlers
            .read()
            .expect("registry lock poisoned")
            .iter()
            .map(|(api_key, entry)| (*api_key, entry.versions))
            .collect()
    }
}

impl Default for MessageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
