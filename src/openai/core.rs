//! HTTP clients for the OpenAI compatible chat completion providers.
//!
//! The two providers expose different native call signatures: the
//! gpt-4o generation takes a single options record, the gpt-3.5
//! generation takes positional arguments (transcript, system
//! instruction). Both end up as a POST to the chat completions
//! endpoint.

use std::time::Duration;

use anyhow::{Error, Result};
use serde_json::{Value, json};

use crate::session::{Message, Role};

/// Options record accepted by the gpt-4o style provider.
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub system_instruction: Option<&'a str>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Calls the provider with a single options record.
pub async fn completion(
    request: CompletionRequest<'_>,
    api_hostname: &str,
    api_key: &str,
    model: &str,
    timeout: Duration,
) -> Result<Value, Error> {
    let mut messages = request.messages.to_vec();
    if let Some(instruction) = request.system_instruction {
        prepend_instruction(&mut messages, instruction);
    }
    let payload = json!({
        "model": model,
        "messages": messages,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    });
    post_completion(payload, api_hostname, api_key, timeout).await
}

/// Calls the provider with positional arguments: the transcript and a
/// system instruction string.
pub async fn legacy_completion(
    messages: &[Message],
    system_instruction: &str,
    api_hostname: &str,
    api_key: &str,
    model: &str,
    timeout: Duration,
) -> Result<Value, Error> {
    let mut messages = messages.to_vec();
    prepend_instruction(&mut messages, system_instruction);
    let payload = json!({
        "model": model,
        "messages": messages,
    });
    post_completion(payload, api_hostname, api_key, timeout).await
}

// The transcript may already carry a system message when the caller
// supplied a system prompt; don't stack a second one.
fn prepend_instruction(messages: &mut Vec<Message>, instruction: &str) {
    if !messages.first().is_some_and(|m| m.role == Role::System) {
        messages.insert(0, Message::new(Role::System, instruction));
    }
}

async fn post_completion(
    payload: Value,
    api_hostname: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<Value, Error> {
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(timeout)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response)
}

/// Extracts the assistant's answer from a completion response.
pub fn answer_text(response: &Value) -> Option<&str> {
    response["choices"][0]["message"]["content"].as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion_body(content: &str) -> String {
        json!({
            "choices": [
                { "message": { "role": "assistant", "content": content } }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_completion_returns_provider_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Hello!"))
            .create_async()
            .await;

        let messages = vec![Message::new(Role::User, "Hi")];
        let request = CompletionRequest {
            messages: &messages,
            system_instruction: None,
            temperature: 0.9,
            max_tokens: 2048,
        };
        let response = completion(
            request,
            &server.url(),
            "test-key",
            "gpt-4o",
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(answer_text(&response), Some("Hello!"));
    }

    #[tokio::test]
    async fn test_legacy_completion_prepends_instruction() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(mockito::Matcher::PartialJson(json!({
                "messages": [
                    { "role": "system", "content": "Be terse" },
                    { "role": "user", "content": "Hi" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("Ok"))
            .create_async()
            .await;

        let messages = vec![Message::new(Role::User, "Hi")];
        let response = legacy_completion(
            &messages,
            "Be terse",
            &server.url(),
            "test-key",
            "gpt-3.5",
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(answer_text(&response), Some("Ok"));
    }

    #[tokio::test]
    async fn test_existing_system_message_is_not_stacked() {
        let mut messages = vec![
            Message::new(Role::System, "Already here"),
            Message::new(Role::User, "Hi"),
        ];
        prepend_instruction(&mut messages, "New instruction");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "Already here");
    }

    #[test]
    fn test_answer_text_missing_content() {
        let response = json!({ "error": { "message": "overloaded" } });
        assert_eq!(answer_text(&response), None);
    }
}
