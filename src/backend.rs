//! Text-generation backends.
//!
//! A backend receives the full conversation and sampling options and
//! returns only the newly generated continuation.

use crate::error::Result;
use crate::model::Message;
use crate::options::ConvertOptions;

/// A chat-style text-generation service.
pub trait ChatBackend {
    /// Generates the assistant continuation for a conversation.
    fn generate(&self, messages: &[Message], options: &ConvertOptions) -> Result<String>;
}

impl<F> ChatBackend for F
where
    F: Fn(&[Message], &ConvertOptions) -> Result<String>,
{
    fn generate(&self, messages: &[Message], options: &ConvertOptions) -> Result<String> {
        self(messages, options)
    }
}

#[cfg(feature = "http")]
pub use http::{HttpBackend, HttpBackendConfig, DEFAULT_BASE_URL};

#[cfg(feature = "http")]
mod http {
    use super::ChatBackend;
    use crate::error::{Error, Result};
    use crate::model::Message;
    use crate::options::ConvertOptions;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    /// Default OpenAI-compatible endpoint root.
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/v1";

    /// Connection settings for [`HttpBackend`].
    #[derive(Debug, Clone)]
    pub struct HttpBackendConfig {
        /// Endpoint root; `/chat/completions` is appended.
        pub base_url: String,
        /// Bearer token, if the server requires one.
        pub api_key: Option<String>,
        /// Request timeout. `None` waits indefinitely.
        pub timeout: Option<Duration>,
    }

    impl Default for HttpBackendConfig {
        fn default() -> Self {
            Self {
                base_url: DEFAULT_BASE_URL.to_string(),
                api_key: None,
                timeout: None,
            }
        }
    }

    impl HttpBackendConfig {
        /// Sets the endpoint root.
        pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
            self.base_url = base_url.into();
            self
        }

        /// Sets the bearer token.
        pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
            self.api_key = Some(api_key.into());
            self
        }

        /// Sets the request timeout.
        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = Some(timeout);
            self
        }

        /// Returns the full chat completions URL.
        pub fn endpoint(&self) -> String {
            format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
        }
    }

    #[derive(Serialize)]
    struct ChatRequest<'a> {
        model: &'a str,
        messages: &'a [Message],
        temperature: f32,
        top_p: f32,
        max_tokens: u32,
        #[serde(skip_serializing_if = "<[String]>::is_empty")]
        stop: &'a [String],
    }

    impl<'a> ChatRequest<'a> {
        fn new(messages: &'a [Message], options: &'a ConvertOptions) -> Self {
            Self {
                model: &options.model,
                messages,
                temperature: options.effective_temperature(),
                top_p: options.top_p,
                max_tokens: options.max_new_tokens,
                stop: &options.stop,
            }
        }
    }

    #[derive(Deserialize)]
    struct ChatResponse {
        #[serde(default)]
        choices: Vec<Choice>,
    }

    #[derive(Deserialize)]
    struct Choice {
        message: ChoiceMessage,
    }

    #[derive(Deserialize)]
    struct ChoiceMessage {
        content: Option<String>,
    }

    impl ChatResponse {
        fn into_content(self) -> Result<String> {
            self.choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| Error::MalformedResponse("no message content in first choice".into()))
        }
    }

    /// Backend for OpenAI-compatible `/chat/completions` servers.
    ///
    /// The server applies the model's chat template, so the reply holds
    /// only the generated continuation.
    pub struct HttpBackend {
        client: reqwest::blocking::Client,
        config: HttpBackendConfig,
    }

    impl HttpBackend {
        /// Creates a backend with a single reusable HTTP client.
        pub fn new(config: HttpBackendConfig) -> Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(config.timeout)
                .build()?;
            Ok(Self { client, config })
        }

        /// Returns the connection settings.
        pub fn config(&self) -> &HttpBackendConfig {
            &self.config
        }
    }

    impl ChatBackend for HttpBackend {
        fn generate(&self, messages: &[Message], options: &ConvertOptions) -> Result<String> {
            let endpoint = self.config.endpoint();
            log::debug!(
                "POST {} ({} messages, model {})",
                endpoint,
                messages.len(),
                options.model
            );

            let mut request = self
                .client
                .post(&endpoint)
                .json(&ChatRequest::new(messages, options));
            if let Some(ref key) = self.config.api_key {
                request = request.bearer_auth(key);
            }

            let response = request.send()?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(Error::BackendStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: ChatResponse = response
                .json()
                .map_err(|e| Error::MalformedResponse(e.to_string()))?;
            parsed.into_content()
        }
    }

}
