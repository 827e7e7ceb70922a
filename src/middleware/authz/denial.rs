use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::services::policy::AccessDenied;

impl IntoResponse for AccessDenied {
    fn into_response(self) -> Response {
        // Out-of-range overrides fall back to 403 rather than a 500.
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::FORBIDDEN);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[tokio::test]
    async fn renders_json_body_with_status() {
        let resp = AccessDenied::by_policy("/hello").into_response();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "instance": "/hello",
                "title": "Access denied",
                "status": 403,
                "reason": "access denied by policy"
            })
        );
    }

    #[test]
    fn honours_status_override() {
        let resp = AccessDenied::new("/x").with_status(401).into_response();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn invalid_status_falls_back_to_forbidden() {
        let resp = AccessDenied::new("/x").with_status(42).into_response();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
