//! Integration tests for working practice problems with the tutor

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{
        body_to_json, completion_body, create_session, json_request, test_app, test_app_with_llm,
    };

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("POST")
            .body(Body::empty())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Tests opening a problem greets the student once
    #[tokio::test]
    async fn it_opens_a_problem_with_a_greeting() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(mockito::Matcher::Regex(
                "Let's start. How should we approach this?".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("What do you know about the launch angle?"))
            .expect(1)
            .create();

        let (app, _dir) = test_app_with_llm(&server.url());
        let session_id = create_session(&app, "Ada").await;
        let uri = format!("/api/sessions/{}/problems/KIN-01", session_id);

        let response = app.clone().oneshot(post_empty(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["problem"]["id"], "KIN-01");
        assert_eq!(body["progress"]["satisfied"], 0);
        assert_eq!(body["progress"]["total"], 2);
        let transcript = body["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(
            transcript[1]["text"],
            "What do you know about the launch angle?"
        );

        // Reopening keeps the conversation without asking again
        let response = app.clone().oneshot(post_empty(&uri)).await.unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["transcript"].as_array().unwrap().len(), 2);
        mock.assert();

        let response = app
            .oneshot(get(&format!("/api/sessions/{}", session_id)))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["page"]["page"], "chat");
        assert_eq!(body["page"]["problem_id"], "KIN-01");
    }

    /// Tests one message can satisfy several targets and the tutor is
    /// told about it without the student seeing the note
    #[tokio::test]
    async fn it_tracks_targets_found_in_a_turn() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(mockito::Matcher::Regex(
                r"Internal Status: student found Vx, Vy".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(
                "Both correct! (Internal Status: student found Vx, Vy)",
            ))
            .create();

        let (app, _dir) = test_app_with_llm(&server.url());
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/problems/KIN-01/chat", session_id),
                serde_json::json!({"message": "Vx is 17.3 and Vy is about 10.1"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        mock.assert();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["reply"], "Both correct!");
        assert_eq!(body["newly_solved"], serde_json::json!(["Vx", "Vy"]));
        assert_eq!(body["progress"]["satisfied"], 2);
        assert_eq!(body["progress"]["fraction"], 1.0);
        assert_eq!(body["progress"]["complete"], true);

        let response = app
            .oneshot(get(&format!(
                "/api/sessions/{}/problems/KIN-01",
                session_id
            )))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        let transcript = body["transcript"].to_string();
        assert!(transcript.contains("Vx is 17.3 and Vy is about 10.1"));
        assert!(!transcript.contains("Internal Status"));
    }

    /// Tests a found target stays found when the student later says
    /// something wrong
    #[tokio::test]
    async fn it_never_unsolves_a_target() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Keep going."))
            .create();

        let (app, _dir) = test_app_with_llm(&server.url());
        let session_id = create_session(&app, "Ada").await;
        let uri = format!("/api/sessions/{}/problems/KIN-01/chat", session_id);

        for (message, newly) in [
            ("Vx = 17.32", serde_json::json!(["Vx"])),
            ("Actually Vx = 50", serde_json::json!([])),
        ] {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    &uri,
                    serde_json::json!({"message": message}),
                ))
                .await
                .unwrap();
            let body = body_to_json(response.into_body()).await;
            assert_eq!(body["newly_solved"], newly);
            assert_eq!(body["progress"]["satisfied"], 1);
            assert_eq!(body["progress"]["solved"], serde_json::json!(["Vx"]));
        }
    }

    /// Tests a zero target is matched within the absolute tolerance
    #[tokio::test]
    async fn it_matches_a_zero_target() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Right."))
            .create();

        let (app, _dir) = test_app_with_llm(&server.url());
        let session_id = create_session(&app, "Ada").await;
        let uri = format!("/api/sessions/{}/problems/KIN-02/chat", session_id);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &uri,
                serde_json::json!({"message": "about 1.0 m/s"}),
            ))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["progress"]["satisfied"], 0);

        let response = app
            .oneshot(json_request(
                "POST",
                &uri,
                serde_json::json!({"message": "it is 0.02"}),
            ))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["newly_solved"], serde_json::json!(["V0"]));
        assert_eq!(body["progress"]["complete"], true);
    }

    /// Tests a problem with no targets reports empty progress
    #[tokio::test]
    async fn it_handles_problems_without_targets() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("F = ma, what else?"))
            .create();

        let (app, _dir) = test_app_with_llm(&server.url());
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/problems/DYN-01/chat", session_id),
                serde_json::json!({"message": "F is 10 N"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["progress"]["satisfied"], 0);
        assert_eq!(body["progress"]["total"], 0);
        assert_eq!(body["progress"]["fraction"], 0.0);
        assert_eq!(body["progress"]["complete"], false);
    }

    /// Tests progress survives a failed tutor reply
    #[tokio::test]
    async fn it_keeps_progress_when_the_tutor_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .create();

        let (app, _dir) = test_app_with_llm(&server.url());
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/problems/KIN-01/chat", session_id),
                serde_json::json!({"message": "Vy = 10"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = app
            .oneshot(get(&format!(
                "/api/sessions/{}/problems/KIN-01",
                session_id
            )))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["progress"]["solved"], serde_json::json!(["Vy"]));
        assert_eq!(body["transcript"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn it_rejects_an_empty_message() {
        let (app, _dir) = test_app();
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/problems/KIN-01/chat", session_id),
                serde_json::json!({"message": "  "}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_returns_404_for_unknown_ids() {
        let (app, _dir) = test_app();
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .clone()
            .oneshot(post_empty(&format!(
                "/api/sessions/{}/problems/NOPE",
                session_id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(post_empty("/api/sessions/nope/problems/KIN-01"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests submitting grades the session and shows the report
    #[tokio::test]
    async fn it_submits_a_report() {
        let mut server = mockito::Server::new_async().await;
        let _chat = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("8"))
            .create();

        let (app, _dir) = test_app_with_llm(&server.url());
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/problems/KIN-01/chat", session_id),
                serde_json::json!({"message": "Vx = 17.3"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/problems/KIN-01/submit", session_id),
                serde_json::json!({"feedback": "The angle part was confusing"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["score"], 8);
        assert_eq!(
            body["subject"],
            "Eng. Tutor (Ada): Kinematics: Projectile (ID: KIN-01) [Score: 8/10]"
        );
        assert_eq!(body["delivered"], true);

        let response = app
            .clone()
            .oneshot(get(&format!("/api/sessions/{}/report", session_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["score"], 8);

        let response = app
            .oneshot(get(&format!("/api/sessions/{}", session_id)))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["page"]["page"], "report_view");
    }

    /// Tests the grader failing still produces a report
    #[tokio::test]
    async fn it_submits_without_body_when_grading_fails() {
        let mut server = mockito::Server::new_async().await;
        let _chat = server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .create();

        let (app, _dir) = test_app_with_llm(&server.url());
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .oneshot(post_empty(&format!(
                "/api/sessions/{}/problems/KIN-01/submit",
                session_id
            )))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["score"], 0);
        assert!(body["body"].as_str().unwrap().starts_with("Analysis failed:"));
    }

    #[tokio::test]
    async fn it_rejects_invalid_submit_json() {
        let (app, _dir) = test_app();
        let session_id = create_session(&app, "Ada").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/sessions/{}/problems/KIN-01/submit",
                        session_id
                    ))
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
