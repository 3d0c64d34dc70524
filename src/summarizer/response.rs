//! Provider response shapes and generated text extraction.
//!
//! Hosted inference providers disagree on response layout. Chat completion
//! endpoints return `{"choices": [{"message": {"content": ...}}]}` while the
//! classic text-generation endpoints return `[{"generated_text": ...}]`. Both
//! are parsed into [`ProviderResponse`] and read through [`GeneratedText`],
//! so the rest of the summarizer never looks at provider JSON.
use serde::Deserialize;

/// Capability of a response to yield the text a model generated.
pub trait GeneratedText {
    /// Generated text, or `None` when the response carries no usable text.
    fn generated_text(&self) -> Option<String>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextGeneration {
    pub generated_text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
/// Every response layout the summarizer understands, tried in order.
pub enum ProviderResponse {
    Chat(ChatCompletion),
    Generations(Vec<TextGeneration>),
}

/// Trimmed text, or `None` when only whitespace remains.
fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl GeneratedText for ChatCompletion {
    fn generated_text(&self) -> Option<String> {
        let content = self.choices.first()?.message.as_ref()?.content.as_ref()?;
        non_blank(content)
    }
}

impl GeneratedText for Vec<TextGeneration> {
    fn generated_text(&self) -> Option<String> {
        non_blank(&self.first()?.generated_text)
    }
}

impl GeneratedText for ProviderResponse {
    fn generated_text(&self) -> Option<String> {
        match self {
            ProviderResponse::Chat(chat) => chat.generated_text(),
            ProviderResponse::Generations(generations) => {
                generations.generated_text()
            }
        }
    }
}
