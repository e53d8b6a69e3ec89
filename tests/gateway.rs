//! End-to-end tests for the API gateway.

use axum::http::StatusCode;
use std::time::Duration;

mod common;
use common::MockResponse;

#[tokio::test]
async fn test_success_relayed_unchanged() {
    let (backend, recorded) =
        common::start_backend(|_| MockResponse::json(200, r#"{"id":5}"#)).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let res = common::client()
        .get(format!("http://{}/api_proxy/articles/5", frontend))
        .header("Cookie", "session=abc")
        .header("Accept", "text/html")
        .send()
        .await
        .expect("Frontend unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), r#"{"id":5}"#);

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "GET");
    assert_eq!(req.target, "/api/articles/5");
    assert_eq!(req.header("accept"), Some("application/json"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("cookie"), Some("session=abc"));
    assert_eq!(req.header("host"), Some(backend.to_string().as_str()));
    assert!(req.header("x-request-id").is_some());

    shutdown.trigger();
}

#[tokio::test]
async fn test_endpoint_query_parameter() {
    let (backend, recorded) = common::start_backend(|_| MockResponse::json(200, "{}")).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let res = common::client()
        .get(format!("http://{}/api_proxy?endpoint=articles/7", frontend))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(recorded.lock().unwrap()[0].target, "/api/articles/7");

    shutdown.trigger();
}

#[tokio::test]
async fn test_legacy_api_path_keeps_query() {
    let (backend, recorded) =
        common::start_backend(|_| MockResponse::json(200, r#"{"articles":[]}"#)).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let res = common::client()
        .get(format!("http://{}/api/articles?user_id=3", frontend))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(recorded.lock().unwrap()[0].target, "/api/articles?user_id=3");

    shutdown.trigger();
}

#[tokio::test]
async fn test_no_endpoint_is_404_without_upstream_call() {
    let (backend, recorded) = common::start_backend(|_| MockResponse::json(200, "{}")).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let res = common::client()
        .get(format!("http://{}/api_proxy", frontend))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid API endpoint");
    assert!(recorded.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_server_error_text_wrapped() {
    let (backend, _) = common::start_backend(|_| MockResponse::text(503, "oops")).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let res = common::client()
        .delete(format!("http://{}/api_proxy/articles/9", frontend))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Backend server error");
    assert_eq!(body["details"], "oops");

    shutdown.trigger();
}

#[tokio::test]
async fn test_backend_error_payload_relayed() {
    let (backend, _) = common::start_backend(|_| {
        MockResponse::json(409, r#"{"error":"Username already exists"}"#)
    })
    .await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let res = common::client()
        .post(format!("http://{}/api_proxy/signup", frontend))
        .body(r#"{"username":"bender","password":"x"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(res.text().await.unwrap(), r#"{"error":"Username already exists"}"#);

    shutdown.trigger();
}

#[tokio::test]
async fn test_json_body_forwarded_verbatim() {
    let (backend, recorded) =
        common::start_backend(|_| MockResponse::json(201, r#"{"success":true}"#)).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let payload = r#"{"title":"Hello","tags":["a","b"]}"#;
    let res = common::client()
        .put(format!("http://{}/api_proxy/articles/3", frontend))
        .header("Content-Type", "text/plain")
        .body(payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = recorded.lock().unwrap()[0].clone();
    assert_eq!(req.method, "PUT");
    assert_eq!(req.body_str(), payload);
    assert_eq!(req.header("content-type"), Some("application/json"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_form_submission_reencoded_as_json() {
    let (backend, recorded) =
        common::start_backend(|_| MockResponse::json(200, r#"{"success":true}"#)).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let res = common::client()
        .post(format!("http://{}/api_proxy/login", frontend))
        .form(&[("username", "bender"), ("password", "bite my")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let req = recorded.lock().unwrap()[0].clone();
    let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
    assert_eq!(body, serde_json::json!({"username": "bender", "password": "bite my"}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_backend_synthesized_500() {
    // Reserve a port, then free it so nothing is listening there.
    let dead = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (frontend, shutdown) = common::start_frontend(common::config_for(dead)).await;
    let client = common::client();

    for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        let res = client
            .request(
                method.parse().unwrap(),
                format!("http://{}/api_proxy/articles", frontend),
            )
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "API request failed");
        assert_eq!(body["code"], "connect");
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let (backend, _) = common::start_backend(|_| {
        MockResponse::json(200, "{}").delayed(Duration::from_secs(3))
    })
    .await;
    let mut config = common::config_for(backend);
    config.timeouts.connect_secs = 1;
    config.timeouts.request_secs = 1;
    let (frontend, shutdown) = common::start_frontend(config).await;

    let res = common::client()
        .get(format!("http://{}/api_proxy/skins", frontend))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], "timeout");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unsupported_method_rejected() {
    let (backend, recorded) = common::start_backend(|_| MockResponse::json(200, "{}")).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let res = common::client()
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}/api_proxy/articles/1", frontend),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(recorded.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_endpoint() {
    let (backend, _) = common::start_backend(|_| MockResponse::json(200, "{}")).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;

    let res = common::client()
        .get(format!("http://{}/healthz", frontend))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    shutdown.trigger();
}

#[tokio::test]
async fn test_bare_gateway_paths_reach_resolver() {
    let (backend, recorded) = common::start_backend(|_| MockResponse::json(200, "{}")).await;
    let (frontend, shutdown) = common::start_frontend(common::config_for(backend)).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/api_proxy/?endpoint=articles/7", frontend))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(recorded.lock().unwrap()[0].target, "/api/articles/7");

    for path in ["/api", "/api/", "/api_proxy/"] {
        let res = client
            .get(format!("http://{}{}", frontend, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Invalid API endpoint", "{path}");
    }
    assert_eq!(recorded.lock().unwrap().len(), 1);

    shutdown.trigger();
}
