//! OpenAI-compatible chat-completions classifier
//!
//! Deterministic settings (temperature 0, strict JSON output). The parse
//! tolerates what models actually return: fenced output is unfenced,
//! unknown achado labels degrade to `unclassified`, and argument entries
//! are accepted either as objects with supporting spans or as bare ids.

use std::time::Duration;

use recursal_core::catalog;
use recursal_core::types::{ArgumentCandidate, ArgumentId, FindingCategory};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::classifier::{
    Classification, Classifier, ClassifierError, ClassifierResult, ClassifyRequest,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct OpenAiClassifier {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: OPENAI_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn send(&self, request: &ClassifyRequest) -> ClassifierResult<Classification> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: build_prompt(request),
            }],
            temperature: 0.0,
        };

        debug!("classifier request: model={}", body.model);

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout(e.to_string())
                } else {
                    ClassifierError::NetworkError(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("classifier error {}: {}", status, error_text);
            return Err(match status.as_u16() {
                401 => ClassifierError::AuthFailed(error_text),
                429 => ClassifierError::RateLimited {
                    retry_after_ms: 60000,
                },
                _ => ClassifierError::RequestFailed(format!("{}: {}", status, error_text)),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ClassifierError::InvalidResponse("empty choices".into()))?;

        parse_classification(content)
    }
}

#[async_trait::async_trait]
impl Classifier for OpenAiClassifier {
    fn name(&self) -> &str {
        "openai"
    }

    async fn classify(
        &self,
        request: ClassifyRequest,
        cancel: Option<CancellationToken>,
    ) -> ClassifierResult<Classification> {
        match cancel {
            Some(token) => {
                tokio::select! {
                    result = self.send(&request) => result,
                    _ = token.cancelled() => Err(ClassifierError::Cancelled),
                }
            }
            None => self.send(&request).await,
        }
    }
}

/// Bilingual prompt: task framing in Portuguese (the case material is
/// Portuguese), strict JSON output contract.
pub fn build_prompt(request: &ClassifyRequest) -> String {
    let mut catalog_lines = String::new();
    for kind in catalog::CATALOG {
        catalog_lines.push_str(&format!("- {}: {}\n", kind.id, kind.description));
    }
    let labels = FindingCategory::ALL
        .iter()
        .map(|c| format!("- \"{}\"", c.label()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Você é um sistema de apoio jurídico que analisa recursos administrativos de pensão de filha maior solteira.

### Bloco 1 — Achado do TCU (texto do extrato)
{extract}

### Bloco 2 — Defesa apresentada pela interessada
{defense}

### Tarefa
1. Classifique o achado do TCU em um dos seguintes rótulos:
{labels}

2. Identifique quais argumentos da defesa correspondem aos seguintes códigos:
{catalog_lines}
Para cada argumento identificado, transcreva o trecho literal da defesa que o sustenta.

3. Se existirem argumentos adicionais que não se enquadram nos códigos, liste-os em "outros".

### Formato de saída
Responda apenas com JSON válido, sem explicações, sem Markdown, no seguinte formato:

{{
  "achado": "rótulo escolhido",
  "argumentos": [{{"id": 4, "trecho": "trecho literal da defesa", "confianca": 0.9}}],
  "outros": ["boa-fé", "segurança jurídica"]
}}"#,
        extract = request.extract_text,
        defense = request.defense_text,
        labels = labels,
        catalog_lines = catalog_lines,
    )
}

/// Parse the model's JSON answer into a [`Classification`].
pub fn parse_classification(raw: &str) -> ClassifierResult<Classification> {
    let cleaned = strip_fences(raw);
    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| ClassifierError::InvalidResponse(format!("not valid JSON: {e}")))?;

    let category = value
        .get("achado")
        .and_then(Value::as_str)
        .map_or(FindingCategory::Unclassified, FindingCategory::from_label);

    let mut candidates = Vec::new();
    if let Some(entries) = value.get("argumentos").and_then(Value::as_array) {
        for entry in entries {
            if let Some(candidate) = parse_candidate(entry) {
                candidates.push(candidate);
            }
        }
    }

    let unmapped = value
        .get("outros")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Classification {
        category,
        candidates,
        unmapped,
    })
}

/// One argument entry: an object with an id and supporting span, or a bare
/// numeric/string id (earlier prompt revisions used the bare form).
fn parse_candidate(entry: &Value) -> Option<ArgumentCandidate> {
    let (id, source_text, confidence) = match entry {
        Value::Object(obj) => {
            let id = obj.get("id").and_then(value_as_id)?;
            let text = obj
                .get("trecho")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let confidence = obj
                .get("confianca")
                .and_then(Value::as_f64)
                .unwrap_or(0.0) as f32;
            (id, text, confidence)
        }
        other => (value_as_id(other)?, String::new(), 0.0),
    };
    Some(ArgumentCandidate {
        argument_id: id,
        source_text,
        confidence,
    })
}

fn value_as_id(value: &Value) -> Option<ArgumentId> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u8>().ok(),
        _ => None,
    }
    .map(ArgumentId)
}

/// Strip a Markdown code fence the model may wrap the JSON in.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}
