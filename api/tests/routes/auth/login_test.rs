#[cfg(test)]
mod tests {
    use crate::helpers::{app::json_request, make_test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn login_with_dashboard_password_issues_token() {
        let t = make_test_app().await;

        let req = json_request("POST", "/api/auth/login", json!({ "password": "letmein" }));
        let (status, json) = t.send(req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(!json["data"]["token"].as_str().unwrap().is_empty());
        assert!(json["data"]["expires_at"].is_string());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let t = make_test_app().await;

        let req = json_request("POST", "/api/auth/login", json!({ "password": "123" }));
        let (status, json) = t.send(req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid password. Please try again.");
    }

    #[tokio::test]
    async fn login_with_empty_password_fails_validation() {
        let t = make_test_app().await;

        let req = json_request("POST", "/api/auth/login", json!({ "password": "" }));
        let (status, json) = t.send(req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Password is required");
    }
}
