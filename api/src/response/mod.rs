use serde::Serialize;

/// Standard envelope for all outgoing JSON responses:
///
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// Error responses carry `success: false` and a human-readable `message`;
/// internals never leak into the body.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Error envelope with default `data`. `T` must implement `Default`
    /// because failures have no useful payload.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Zero-data payload for error envelopes with no success counterpart.
#[derive(Serialize, Default)]
pub struct Empty;
