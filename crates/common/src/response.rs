//! Success envelope for JSON responses: `{"success": true, "data": ...}`.
//! The failure shape (`success: false`) is produced by the server error type.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiData<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiData<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Bare `{"success": true}` acknowledgement for mutations with no payload.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let v = serde_json::to_value(ApiData::new(vec![1, 2])).unwrap();
        assert_eq!(v, serde_json::json!({"success": true, "data": [1, 2]}));
        let a = serde_json::to_value(Ack::ok()).unwrap();
        assert_eq!(a, serde_json::json!({"success": true}));
    }
}
