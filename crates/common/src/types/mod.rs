use serde::{Deserialize, Serialize};

/// Plain-text body returned by `GET /`.
pub const LIVENESS_BANNER: &str = "Creative Agency Server Running";

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body shared by guard rejections: `{"error": true, "message": "..."}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: true, message: message.into() }
    }
}
