use crate::announce::signing::SignedRequest;
use crate::config::SpeechConfig;
use crate::error::{Result, SpeechError, WedlotError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// Synthesized audio as returned by a provider.
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Networked text-to-speech.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn synthesize(&self, text: &str) -> std::result::Result<SpeechAudio, SpeechError>;
}

/// Provider speaking the signed form protocol (appKey/salt/curtime/sign).
pub struct HttpSpeechProvider {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl HttpSpeechProvider {
    pub fn new(config: SpeechConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("wedlot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WedlotError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl SpeechProvider for HttpSpeechProvider {
    async fn synthesize(&self, text: &str) -> std::result::Result<SpeechAudio, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::MissingText);
        }

        let request = SignedRequest::new(&self.config, text);
        tracing::debug!(
            "Calling speech provider at {} (sign {}...)",
            self.config.endpoint,
            &request.sign[..10]
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .form(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if content_type.contains("audio") {
            let bytes = response.bytes().await?;
            tracing::debug!("Received {} bytes of {}", bytes.len(), content_type);
            return Ok(SpeechAudio {
                bytes: bytes.to_vec(),
                content_type,
            });
        }

        // Errors come back as a 200 with a JSON body.
        let body = response.text().await?;
        let details = serde_json::from_str::<serde_json::Value>(&body)
            .unwrap_or(serde_json::Value::String(body));
        let error_code = details
            .get("errorCode")
            .map(|code| code.as_str().map(str::to_string).unwrap_or_else(|| code.to_string()));

        Err(SpeechError::NonAudio {
            content_type,
            details,
            error_code,
        })
    }
}
