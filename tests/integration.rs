use pretty_assertions::assert_eq;
use vizzy_chat::{
    api::{ChatApi, HttpChatApi, MockChatApi},
    app::App,
    client::ChatClient,
    error::GENERIC_ERROR_MESSAGE,
    models::{BuildMode, ChatReply, Mode},
    render::OutputView,
    state::{ClientState, Submission},
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_client(server: &MockServer) -> ChatClient {
    let state = ClientState::with_session(server.uri(), "session-1700000000000".to_string());
    let api = HttpChatApi::new(state.api_base_url().to_string());
    ChatClient::new(Box::new(api), state)
}

#[tokio::test]
async fn test_chat_round_trip_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(serde_json::json!({
            "message": "Hello",
            "mode": "chat",
            "session_id": "session-1700000000000"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "Hi! How can I help?",
            "mode": "chat",
            "session_id": "session-1700000000000",
            "timestamp": "2024-01-01T10:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = http_client(&server);
    client.set_input("Hello");

    assert_eq!(client.submit().await, Submission::Succeeded);
    assert_eq!(client.state().output(), "Hi! How can I help?");
    assert_eq!(client.state().input(), "");
    assert!(!client.state().is_loading());
    assert_eq!(
        client.view().output,
        Some(OutputView::Text("Hi! How can I help?"))
    );
}

#[tokio::test]
async fn test_message_field_fallback_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "Hello"})),
        )
        .mount(&server)
        .await;

    let mut client = http_client(&server);
    client.set_input("hi");
    client.submit().await;

    assert_eq!(client.state().output(), "Hello");
}

#[tokio::test]
async fn test_image_mode_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(serde_json::json!({"mode": "image"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "https://via.placeholder.com/500x500?text=a%20red%20fox"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = http_client(&server);
    client.set_mode(Mode::Image);
    client.set_input("a red fox");
    client.submit().await;

    assert_eq!(
        client.view().output,
        Some(OutputView::Image(
            "https://via.placeholder.com/500x500?text=a%20red%20fox"
        ))
    );
}

#[tokio::test]
async fn test_failures_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(serde_json::json!({"message": "limited"})))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(serde_json::json!({"detail": "Rate limited"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(serde_json::json!({"message": "broken"})))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut client = http_client(&server);

    client.set_input("limited");
    assert_eq!(client.submit().await, Submission::Failed);
    assert_eq!(client.state().error(), "Rate limited");

    client.set_input("broken");
    assert_eq!(client.submit().await, Submission::Failed);
    assert_eq!(client.state().error(), GENERIC_ERROR_MESSAGE);
    assert_eq!(client.state().input(), "broken");
    assert!(!client.state().is_loading());
}

#[tokio::test]
async fn test_blank_input_sends_nothing_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = http_client(&server);
    client.set_input(" \n\t ");
    let before = client.state().clone();

    assert_eq!(client.submit().await, Submission::Skipped);
    assert_eq!(client.state(), &before);
}

#[tokio::test]
async fn test_loading_only_while_request_in_flight() {
    let api = MockChatApi::new().with_response("done");
    let mut state = ClientState::with_session(
        "http://localhost:8000".to_string(),
        "session-1".to_string(),
    );
    state.set_input("hello");
    assert!(!state.is_loading());

    let request = state.begin_submission().unwrap();
    assert!(state.is_loading());

    let result = api.send_chat(&request).await;
    assert!(state.is_loading());

    state.settle(result);
    assert!(!state.is_loading());
    assert_eq!(state.output(), "done");
}

#[tokio::test]
async fn test_session_id_stable_across_submissions_and_toggles() {
    let api = MockChatApi::new();
    let probe = api.clone();
    let state = ClientState::initialize(BuildMode::Development, None);
    let session_id = state.session_id().to_string();
    let mut client = ChatClient::new(Box::new(api), state);

    for mode in [Mode::Image, Mode::Chat, Mode::Image, Mode::Chat] {
        client.set_mode(mode);
        client.set_input("prompt");
        client.submit().await;
        assert_eq!(client.state().session_id(), session_id);
    }

    assert_eq!(probe.get_call_count(), 4);
    assert!(probe.requests().iter().all(|r| r.session_id == session_id));
    assert_eq!(client.state().api_base_url(), "http://localhost:8000");
}

#[tokio::test]
async fn test_app_session_against_mock_backend() {
    let api = MockChatApi::new()
        .with_response("first answer")
        .with_failure(503, Some("Image backend unavailable"));
    let probe = api.clone();
    let client = ChatClient::new(
        Box::new(api),
        ClientState::with_session(
            "http://localhost:8000".to_string(),
            "session-9".to_string(),
        ),
    );
    let mut app = App::with_client(client, None);

    let mut out = Vec::new();
    app.run("what is rust?\n/image\na crab\n/quit\n".as_bytes(), &mut out)
        .await
        .unwrap();
    let output = String::from_utf8(out).unwrap();

    assert!(output.contains("first answer"));
    assert!(output.contains("Error: Image backend unavailable"));
    assert_eq!(probe.get_call_count(), 2);

    // Stale output stays next to the new error; the image failure keeps the prompt.
    let state = app.client().state();
    assert_eq!(state.output(), "first answer");
    assert_eq!(state.input(), "a crab");
    assert_eq!(state.mode(), Mode::Image);
}

#[test]
fn test_reply_precedence_is_explicit() {
    let body = serde_json::json!({"response": "primary", "message": "secondary"});
    assert_eq!(
        ChatReply::from_body(&body),
        ChatReply::Response("primary".to_string())
    );
}
