mod common;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use threadchat::config::{ApiKeySource, ChatConfig};
use threadchat::providers::OpenAiProvider;
use threadchat::{ChatSession, CompletionGateway, CompletionParams, Role, SendOutcome};

fn session_for(server: &MockServer) -> ChatSession {
    let provider = OpenAiProvider::new(common::openai_config_for(server)).unwrap();
    let mut session = ChatSession::new(
        CompletionGateway::new(Box::new(provider)),
        CompletionParams::from(&ChatConfig::default()),
    );
    session.set_api_key("sk-test", ApiKeySource::Prompt);
    session
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// Create a conversation, ask one question, and check the stored exchange
#[tokio::test]
async fn test_first_question_is_answered_and_titles_the_conversation() {
    let server = MockServer::start().await;
    common::mount_completion(&server, "4").await;

    let mut session = session_for(&server);
    let id = session.store_mut().create();
    assert_eq!(session.store().current().unwrap().title(), "New Chat 1");

    let outcome = session.send("What is 2+2?").await.unwrap();
    assert_eq!(
        outcome,
        SendOutcome::Replied {
            conversation_id: id.clone(),
            reply: "4".to_string(),
        }
    );

    let conversation = session.store().get(&id).unwrap();
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation.messages()[0].role(), Role::User);
    assert_eq!(conversation.messages()[0].content(), "What is 2+2?");
    assert_eq!(conversation.messages()[1].role(), Role::Assistant);
    assert_eq!(conversation.messages()[1].content(), "4");
    assert_eq!(conversation.title(), "What is 2+2?");

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["model"], "gpt-4o");
    assert_eq!(bodies[0]["max_tokens"], 500);
    assert_eq!(bodies[0]["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_follow_up_question_carries_history() {
    let server = MockServer::start().await;
    common::mount_completion(&server, "ok").await;

    let mut session = session_for(&server);
    session.send("first question").await.unwrap();
    session.send("second question").await.unwrap();

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);

    let messages = bodies[1]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "first question");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[2]["content"], "ok");
    assert_eq!(messages[3]["content"], "Question: second question");
}

#[tokio::test]
async fn test_long_conversation_sends_bounded_history() {
    let server = MockServer::start().await;
    common::mount_completion(&server, "ok").await;

    let mut session = session_for(&server);
    for i in 0..8 {
        session.send(&format!("question {}", i)).await.unwrap();
    }

    let bodies = request_bodies(&server).await;
    let last = bodies.last().unwrap()["messages"].as_array().unwrap();
    // system + 10 history messages + question
    assert_eq!(last.len(), 12);
    assert_eq!(last[1]["content"], "question 2");
}

/// A rejected key produces an error reply that is stored like any other
#[tokio::test]
async fn test_authentication_failure_becomes_error_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "error": { "message": "Incorrect API key" } })),
        )
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    let outcome = session.send("hello").await.unwrap();

    let SendOutcome::Replied {
        conversation_id,
        reply,
    } = outcome
    else {
        panic!("expected an error reply");
    };
    assert!(reply.starts_with("Error: "));
    assert!(reply.contains("Incorrect API key"));
    assert!(reply.ends_with("Please check your API key and try again."));

    let conversation = session.store().get(&conversation_id).unwrap();
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation.messages()[1].content(), reply);
}

#[tokio::test]
async fn test_switching_conversations_keeps_histories_apart() {
    let server = MockServer::start().await;
    common::mount_completion(&server, "ok").await;

    let mut session = session_for(&server);
    let first = session.store_mut().create();
    session.send("about cats").await.unwrap();

    let second = session.store_mut().create();
    session.send("about dogs").await.unwrap();

    session.store_mut().select(&first).unwrap();
    session.send("more cats").await.unwrap();

    assert_eq!(session.store().get(&first).unwrap().len(), 4);
    assert_eq!(session.store().get(&second).unwrap().len(), 2);

    let bodies = request_bodies(&server).await;
    let messages = bodies[2]["messages"].as_array().unwrap();
    assert_eq!(messages[1]["content"], "about cats");
    assert!(messages
        .iter()
        .all(|m| m["content"] != "about dogs"));
}

#[tokio::test]
async fn test_no_request_without_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(common::openai_config_for(&server)).unwrap();
    let mut session = ChatSession::new(
        CompletionGateway::new(Box::new(provider)),
        CompletionParams::from(&ChatConfig::default()),
    );

    assert_eq!(
        session.send("hello").await.unwrap(),
        SendOutcome::MissingApiKey
    );
    assert!(session.store().is_empty());
}
