// Chat relay: render the conversation into one prompt and forward it to the model.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::metrics;
use crate::provider::{ProviderError, TextGenerator};

pub const SYSTEM_PREAMBLE: &str =
    "You are a helpful AI assistant. Maintain the context of previous messages.";
const HISTORY_HEADER: &str = "Here is the conversation so far:";

// ── Wire types ───────────────────────────────────────────────────────

/// One message in the conversation, tagged with its speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Oldest first. Supplied in full by the caller on every request.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Body of every `/api/chat` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Reply {
        response: String,
    },
    Rejected {
        error: String,
    },
    Failed {
        error: String,
        details: String,
        timestamp: String,
    },
}

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Message is required")]
    MissingMessage,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Empty response from Gemini")]
    EmptyResponse,
    #[error("Model did not respond within {0:?}")]
    Timeout(Duration),
}

impl RelayError {
    /// True when the caller sent a bad request; false for upstream failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::MissingMessage)
    }
}

// ── Prompt rendering ─────────────────────────────────────────────────

/// Render each turn as `"<role>: <content>"`, one per line.
pub fn render_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the single prompt string sent to the model.
pub fn build_prompt(message: &str, history: &[ChatTurn]) -> String {
    format!(
        "{SYSTEM_PREAMBLE} {HISTORY_HEADER}\n{}\nUser: {message}\nAssistant:",
        render_history(history)
    )
}

// ── Relay ────────────────────────────────────────────────────────────

/// Stateless relay between callers and the model provider.
#[derive(Clone)]
pub struct ChatRelay {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl ChatRelay {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Answer one chat request. Makes at most one provider call and never
    /// retries.
    pub async fn respond(&self, request: &ChatRequest) -> Result<String, RelayError> {
        let message = match request.message.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => {
                tracing::info!("Missing message in request");
                return Err(RelayError::MissingMessage);
            }
        };

        let prompt = build_prompt(message, &request.history);
        tracing::info!(
            model = self.generator.model(),
            history_turns = request.history.len(),
            prompt_chars = prompt.len(),
            "Sending message to model"
        );
        tracing::debug!(%prompt, "Rendered prompt");

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await;
        metrics::CHAT_UPSTREAM_DURATION_SECONDS.observe(started.elapsed().as_secs_f64());

        let text = match outcome {
            Ok(result) => result?,
            Err(_) => return Err(RelayError::Timeout(self.timeout)),
        };

        if text.is_empty() {
            tracing::error!("Empty response from Gemini");
            return Err(RelayError::EmptyResponse);
        }

        tracing::info!(response_chars = text.len(), "Received response from model");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records prompts and returns a canned result.
    struct Scripted {
        reply: Result<String, String>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        delay: Duration,
    }

    impl Scripted {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                delay: Duration::ZERO,
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(msg.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                delay: Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone().map_err(ProviderError::Api)
        }
    }

    fn turn(role: &str, content: &str) -> ChatTurn {
        ChatTurn {
            role: role.into(),
            content: content.into(),
        }
    }

    fn request(message: Option<&str>, history: Vec<ChatTurn>) -> ChatRequest {
        ChatRequest {
            message: message.map(String::from),
            history,
        }
    }

    #[test]
    fn test_prompt_with_empty_history() {
        let prompt = build_prompt("Hello", &[]);
        assert_eq!(
            prompt,
            "You are a helpful AI assistant. Maintain the context of previous messages. \
             Here is the conversation so far:\n\nUser: Hello\nAssistant:"
        );
        assert!(prompt.starts_with(SYSTEM_PREAMBLE));
        assert!(prompt.ends_with("User: Hello\nAssistant:"));
    }

    #[test]
    fn test_history_rendering_preserves_order() {
        let history = vec![turn("user", "hi"), turn("assistant", "hello")];
        assert_eq!(render_history(&history), "user: hi\nassistant: hello");

        let prompt = build_prompt("how are you", &history);
        assert!(prompt.contains("so far:\nuser: hi\nassistant: hello\nUser: how are you\nAssistant:"));
    }

    #[test]
    fn test_request_history_defaults_to_empty() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "Hello"}"#).unwrap();
        assert_eq!(req.message.as_deref(), Some("Hello"));
        assert!(req.history.is_empty());

        let req: ChatRequest = serde_json::from_str(r#"{"message": null, "history": []}"#).unwrap();
        assert!(req.message.is_none());
    }

    #[test]
    fn test_response_shapes() {
        let reply = serde_json::to_value(ChatResponse::Reply {
            response: "Hi there!".into(),
        })
        .unwrap();
        assert_eq!(reply, serde_json::json!({"response": "Hi there!"}));

        let rejected = serde_json::to_value(ChatResponse::Rejected {
            error: "Message is required".into(),
        })
        .unwrap();
        assert_eq!(rejected, serde_json::json!({"error": "Message is required"}));
    }

    #[tokio::test]
    async fn test_missing_or_empty_message_skips_provider() {
        let generator = Scripted::ok("unused");
        let relay = ChatRelay::new(generator.clone(), Duration::from_secs(5));

        for req in [
            request(None, vec![]),
            request(Some(""), vec![turn("user", "hi")]),
        ] {
            let err = relay.respond(&req).await.unwrap_err();
            assert!(matches!(err, RelayError::MissingMessage));
            assert!(err.is_client_error());
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_returns_model_text() {
        let generator = Scripted::ok("Hi there!");
        let relay = ChatRelay::new(generator.clone(), Duration::from_secs(5));

        let history = vec![turn("user", "hi"), turn("assistant", "hello")];
        let req = request(Some("how are you"), history.clone());
        let text = relay.respond(&req).await.unwrap();

        assert_eq!(text, "Hi there!");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            generator.prompts.lock().unwrap()[0],
            build_prompt("how are you", &history)
        );
        // History is read, never modified
        assert_eq!(req.history, history);
    }

    #[tokio::test]
    async fn test_empty_model_output_is_failure() {
        let relay = ChatRelay::new(Scripted::ok(""), Duration::from_secs(5));
        let err = relay.respond(&request(Some("Hello"), vec![])).await.unwrap_err();
        assert!(matches!(err, RelayError::EmptyResponse));
        assert_eq!(err.to_string(), "Empty response from Gemini");
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_provider_error_message_is_preserved() {
        let generator = Scripted::failing("rate limited");
        let relay = ChatRelay::new(generator.clone(), Duration::from_secs(5));
        let err = relay.respond(&request(Some("Hello"), vec![])).await.unwrap_err();
        assert_eq!(err.to_string(), "rate limited");
        // No retry
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let generator = Arc::new(Scripted {
            reply: Ok("too late".into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            delay: Duration::from_secs(60),
        });
        let relay = ChatRelay::new(generator, Duration::from_secs(2));
        let err = relay.respond(&request(Some("Hello"), vec![])).await.unwrap_err();
        assert!(matches!(err, RelayError::Timeout(d) if d == Duration::from_secs(2)));
        assert!(!err.to_string().is_empty());
    }
}
