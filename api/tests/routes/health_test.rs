#[cfg(test)]
mod tests {
    use crate::helpers::{app::get_request, make_test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn health_check_returns_ok_json() {
        let t = make_test_app().await;

        let (status, json) = t.send(get_request("/api/health", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
        assert_eq!(json["message"], "Health check passed");
    }
}
