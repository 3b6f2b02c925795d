#[cfg(test)]
mod tests {
    use crate::helpers::{app::get_request, make_test_app};
    use axum::http::StatusCode;
    use chrono::Duration;

    #[tokio::test]
    async fn current_token_requires_dashboard_login() {
        let t = make_test_app().await;

        let (status, json) = t.send(get_request("/api/attendance/token", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Authentication required");

        let (status, _) = t
            .send(get_request("/api/attendance/token", Some("not-a-jwt")))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn current_token_embeds_check_in_url() {
        let t = make_test_app().await;
        let jwt = t.dashboard_token().await;

        let (status, json) = t
            .send(get_request("/api/attendance/token", Some(&jwt)))
            .await;

        assert_eq!(status, StatusCode::OK);
        let token = json["data"]["token"].as_str().unwrap();
        assert_eq!(token.len(), 16);
        assert_eq!(
            json["data"]["check_in_url"],
            format!("http://attend.test/check-in?token={token}")
        );
        assert_eq!(json["data"]["rotation_seconds"], 15);
        assert_eq!(json["data"]["issued_at"], "2025-09-08 09:00:00");
        assert_eq!(json["data"]["next_rotation_at"], "2025-09-08 09:00:15");
    }

    #[tokio::test]
    async fn token_rotates_after_interval() {
        let t = make_test_app().await;
        let jwt = t.dashboard_token().await;

        let (_, before) = t
            .send(get_request("/api/attendance/token", Some(&jwt)))
            .await;
        t.clock.advance(Duration::seconds(15));
        let (_, after) = t
            .send(get_request("/api/attendance/token", Some(&jwt)))
            .await;

        assert_ne!(before["data"]["token"], after["data"]["token"]);
        assert_eq!(after["data"]["issued_at"], "2025-09-08 09:00:15");
    }

    #[tokio::test]
    async fn check_accepts_current_and_previous_token() {
        let t = make_test_app().await;
        let token = t.current_token();

        let uri = format!("/api/attendance/check?token={token}");
        let (status, json) = t.send(get_request(&uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["token"], token.as_str());

        // One rotation later the scanned token is still in its grace period.
        t.clock.advance(Duration::seconds(20));
        let (status, _) = t.send(get_request(&uri, None)).await;
        assert_eq!(status, StatusCode::OK);

        t.clock.advance(Duration::seconds(15));
        let (status, json) = t.send(get_request(&uri, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "QR code expired. Please rescan.");
    }

    #[tokio::test]
    async fn check_without_token_is_forbidden() {
        let t = make_test_app().await;

        let (status, json) = t
            .send(get_request("/api/attendance/check", None))
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["success"], false);
    }
}
