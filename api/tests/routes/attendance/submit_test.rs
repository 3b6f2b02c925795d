#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::{form_request, json_request, with_connect_info},
        make_test_app,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Duration;
    use serde_json::json;

    const LAB_PC: [u8; 4] = [10, 0, 0, 5];
    const OTHER_PC: [u8; 4] = [10, 0, 0, 6];

    fn submit(body: serde_json::Value, ip: [u8; 4]) -> Request<Body> {
        with_connect_info(json_request("POST", "/api/attendance/submit", body), ip)
    }

    #[tokio::test]
    async fn valid_submission_is_recorded() {
        let t = make_test_app().await;
        let token = t.current_token();

        let (status, json) = t
            .send(submit(
                json!({ "token": token, "name": " Alice ", "identifier": "111" }),
                LAB_PC,
            ))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "Attendance recorded");
        assert_eq!(json["data"]["name"], "Alice");
        assert_eq!(json["data"]["identifier"], "111");
        assert_eq!(json["data"]["timestamp"], "2025-09-08 09:00:00");
        assert_eq!(json["data"]["origin"], "10.0.0.5");

        let contents = std::fs::read_to_string(&t.store_path).unwrap();
        assert_eq!(
            contents,
            "Name,MIS,Timestamp,IP Address\nAlice,111,2025-09-08 09:00:00,10.0.0.5\n"
        );
    }

    #[tokio::test]
    async fn form_field_names_from_the_check_in_page_are_accepted() {
        let t = make_test_app().await;
        let token = t.current_token();

        let (status, json) = t
            .send(submit(
                json!({ "token": token, "student_name": "Bob", "student_mis": "222" }),
                LAB_PC,
            ))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["name"], "Bob");
        assert_eq!(json["data"]["identifier"], "222");
    }

    #[tokio::test]
    async fn second_submission_from_same_origin_is_conflict() {
        let t = make_test_app().await;
        let token = t.current_token();

        let (status, _) = t
            .send(submit(json!({ "token": token, "name": "Alice", "identifier": "111" }), LAB_PC))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        t.clock.advance(Duration::seconds(5));
        let (status, json) = t
            .send(submit(json!({ "token": token, "name": "Bob", "identifier": "222" }), LAB_PC))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            json["message"],
            "Attendance has already been marked from this device/network for today."
        );

        let (status, _) = t
            .send(submit(json!({ "token": token, "name": "Bob", "identifier": "222" }), OTHER_PC))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn same_origin_is_accepted_again_next_day() {
        let t = make_test_app().await;
        let token = t.current_token();
        t.send(submit(json!({ "token": token, "name": "Alice", "identifier": "111" }), LAB_PC))
            .await;

        t.clock.advance(Duration::days(1));
        let token = t.current_token();
        let (status, json) = t
            .send(submit(json!({ "token": token, "name": "Alice", "identifier": "111" }), LAB_PC))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["timestamp"], "2025-09-09 09:00:00");
    }

    #[tokio::test]
    async fn expired_token_is_forbidden() {
        let t = make_test_app().await;
        let token = t.current_token();
        t.clock.advance(Duration::seconds(15));
        t.current_token();
        t.clock.advance(Duration::seconds(15));

        let (status, json) = t
            .send(submit(json!({ "token": token, "name": "Alice", "identifier": "111" }), LAB_PC))
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Submission time expired. Please rescan the QR code.");
    }

    #[tokio::test]
    async fn missing_token_is_forbidden() {
        let t = make_test_app().await;

        let (status, _) = t
            .send(submit(json!({ "name": "Alice", "identifier": "111" }), LAB_PC))
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn blank_fields_are_bad_request_and_token_stays_usable() {
        let t = make_test_app().await;
        let token = t.current_token();

        let (status, json) = t
            .send(submit(json!({ "token": token, "name": "", "identifier": "" }), LAB_PC))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Both Name and MIS are required.");

        let (status, json) = t
            .send(submit(json!({ "token": token, "name": "Alice", "identifier": "  " }), LAB_PC))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "MIS is required.");

        let (status, _) = t
            .send(submit(json!({ "token": token, "name": "Alice", "identifier": "111" }), LAB_PC))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn form_post_from_the_check_in_page_is_recorded() {
        let t = make_test_app().await;
        let token = t.current_token();
        let body = format!("token={token}&student_name=Dana+Lee&student_mis=555");

        let (status, json) = t
            .send(with_connect_info(form_request("/api/attendance/submit", &body), LAB_PC))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["name"], "Dana Lee");
        assert_eq!(json["data"]["identifier"], "555");
    }

    #[tokio::test]
    async fn form_post_still_goes_through_the_duplicate_guard() {
        let t = make_test_app().await;
        let token = t.current_token();
        let body = format!("token={token}&name=Alice&identifier=111");

        let (status, _) = t
            .send(with_connect_info(form_request("/api/attendance/submit", &body), LAB_PC))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) = t
            .send(with_connect_info(form_request("/api/attendance/submit", &body), LAB_PC))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn malformed_json_gets_an_api_error() {
        let t = make_test_app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/attendance/submit")
            .header("content-type", "application/json")
            .body(Body::from("{\"token\": "))
            .unwrap();

        let (status, json) = t.send(with_connect_info(req, LAB_PC)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().starts_with("Invalid submission"));
        assert_eq!(std::fs::read_to_string(&t.store_path).unwrap().lines().count(), 1);
    }

    #[tokio::test]
    async fn unknown_content_type_gets_an_api_error() {
        let t = make_test_app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/attendance/submit")
            .header("content-type", "text/plain")
            .body(Body::from("name=Alice"))
            .unwrap();

        let (status, json) = t.send(with_connect_info(req, LAB_PC)).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().starts_with("Invalid submission"));
    }
}
