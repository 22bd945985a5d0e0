use uuid::Uuid;

/// Per-request context, installed by the request-id middleware.
///
/// Present on every request that went through [`crate::app::build_app`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// A context with a freshly generated (UUIDv7) request id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7().to_string())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}
