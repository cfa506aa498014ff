//! The uniform JSON envelope every endpoint responds with.

use quill_core::query::Pagination;
use serde::{Deserialize, Serialize};

/// `{success, data?, message?, error?, pagination?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            pagination: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
            pagination: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::message(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_omits_absent_fields() {
        let body = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(body, json!({ "success": true, "data": [1, 2] }));

        let body = serde_json::to_value(ApiResponse::failure("Post not found")).unwrap();
        assert_eq!(body, json!({ "success": false, "message": "Post not found" }));
    }

    #[test]
    fn test_pagination_is_camel_case() {
        let pagination = Pagination {
            current_page: 1,
            total_pages: 0,
            total_posts: 0,
            limit: 10,
        };
        let body = serde_json::to_value(ApiResponse::paginated(Vec::<u8>::new(), pagination))
            .unwrap();
        assert_eq!(
            body["pagination"],
            json!({ "currentPage": 1, "totalPages": 0, "totalPosts": 0, "limit": 10 })
        );
    }

    #[test]
    fn test_deserializes_sparse_envelope() {
        let parsed: ApiResponse<String> =
            serde_json::from_value(json!({ "success": true, "message": "ok" })).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.data, None);
    }
}
