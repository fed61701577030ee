//! Integration tests for the sessions API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_json, body_to_string, create_session, json_request, test_app};

    /// Tests a learner must identify themselves
    #[tokio::test]
    async fn it_rejects_a_blank_name() {
        let (app, _dir) = test_app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/sessions",
                serde_json::json!({"user_name": "   "}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Identification is required"));
    }

    /// Tests a new session starts on the landing page
    #[tokio::test]
    async fn it_creates_a_session() {
        let (app, _dir) = test_app();
        let session_id = create_session(&app, " Ada ").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/sessions/{}", session_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["user_name"], "Ada");
        assert_eq!(body["page"]["page"], "landing");
    }

    /// Tests sessions don't leak into each other
    #[tokio::test]
    async fn it_keeps_sessions_apart() {
        let (app, _dir) = test_app();
        let first = create_session(&app, "Ada").await;
        let second = create_session(&app, "Grace").await;
        assert_ne!(first, second);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/sessions/{}", second))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["user_name"], "Grace");
    }

    /// Tests unknown sessions are not found
    #[tokio::test]
    async fn it_returns_404_for_unknown_session() {
        let (app, _dir) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/sessions/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests there is no report before anything was submitted
    #[tokio::test]
    async fn it_has_no_report_until_submitted() {
        let (app, _dir) = test_app();
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/sessions/{}/report", session_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests going back to the menu
    #[tokio::test]
    async fn it_returns_to_the_menu() {
        let (app, _dir) = test_app();
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/sessions/{}/menu", session_id))
                    .method("POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["page"]["page"], "landing");
    }

    /// Tests signing out discards the session and everything in it
    #[tokio::test]
    async fn it_ends_a_session() {
        let (app, _dir) = test_app();
        let session_id = create_session(&app, "Ada").await;
        let uri = format!("/api/sessions/{}", session_id);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(&uri)
                    .method("DELETE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        for (method, path) in [
            ("GET", uri.clone()),
            ("GET", format!("{}/report", uri)),
            ("POST", format!("{}/menu", uri)),
            ("POST", format!("{}/problems/KIN-01/submit", uri)),
            ("DELETE", uri.clone()),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri(&path)
                        .method(method)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, path);
        }
    }

    /// Tests the browser UI is served for anything outside the API
    #[tokio::test]
    async fn it_serves_the_browser_ui() {
        let (app, _dir) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/index.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["cache-control"], "no-cache");
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("tutor"));
    }
}
