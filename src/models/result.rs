use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error payload used when no credential is available or the backend rejected it.
pub const UNAUTHORIZED: &str = "Unauthorized";

/// Uniform envelope returned by every backend call.
///
/// `success` is the discriminant: `data` carries the parsed body on success,
/// `errors` carries the failure payload otherwise. The unused side is `None`
/// and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult {
    pub success: bool,
    pub errors: Option<Value>,
    pub data: Option<Value>,
}

impl ApiResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            errors: None,
            data: Some(data),
        }
    }

    pub fn failure(errors: Value) -> Self {
        Self {
            success: false,
            errors: Some(errors),
            data: None,
        }
    }

    /// Credential missing or rejected
    pub fn unauthorized() -> Self {
        Self::failure(Value::String(UNAUTHORIZED.to_string()))
    }

    pub fn is_unauthorized(&self) -> bool {
        !self.success && self.errors.as_ref().and_then(Value::as_str) == Some(UNAUTHORIZED)
    }

    /// Decode `data` into `T`. `None` for failures or when the shape does not match.
    pub fn data_as<T: DeserializeOwned>(&self) -> Option<T> {
        if !self.success {
            return None;
        }
        let data = self.data.clone().unwrap_or(Value::Null);
        match serde_json::from_value(data) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Response data does not match expected shape: {}", e);
                None
            }
        }
    }
}
