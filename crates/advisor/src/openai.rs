use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{AdviceProvider, AdvisorError, FinancialContext, Language, Tip, VoiceIntent};

const COACH_PROMPT: &str = "You are a financial coach for young Africans using a mobile \
    wallet. Be concrete, short and encouraging. Never invent balances.";

const TIP_FORMAT: &str = "Return only a JSON object with keys \"tip\" (string), \"category\" \
    (one of savings, budgeting, investing, debt, income), \"actionableSteps\" (array of \
    strings) and \"confidence\" (number between 0 and 1).";

const VOICE_FORMAT: &str = "Classify the wallet voice command. Return only a JSON object with \
    keys \"intent\" (send, balance, convert, request or unknown), \"action\" (send_money, \
    check_balance, convert_currency, request_money or none), \"parameters\" (object with \
    optional \"amount\" as a decimal string, \"currency\" as an ISO code and \"recipient\") and \
    \"confidence\" (number between 0 and 1).";

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Provider speaking the OpenAI chat-completions protocol.
#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
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

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, AdvisorError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn chat(&self, system: &str, user: &str, json: bool) -> Result<String, AdvisorError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let resp = self
            .client
            .post(self.url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ErrorBody>().await {
                Ok(err) => err.error.message,
                Err(_) => "provider error".to_string(),
            };
            return Err(AdvisorError::Upstream { status, message });
        }

        resp.json::<ChatResponse>()
            .await?
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AdvisorError::EmptyResponse)
    }
}

#[async_trait]
impl AdviceProvider for OpenAiProvider {
    async fn daily_tip(&self, ctx: &FinancialContext) -> Result<Tip, AdvisorError> {
        let system = format!("{COACH_PROMPT} {TIP_FORMAT}");
        let user = format!("{}Give one tip for today.", ctx.prompt());
        let content = self.chat(&system, &user, true).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn answer(&self, ctx: &FinancialContext, question: &str) -> Result<String, AdvisorError> {
        let user = format!("{}Question: {question}", ctx.prompt());
        self.chat(COACH_PROMPT, &user, false).await
    }

    async fn parse_voice(
        &self,
        transcript: &str,
        language: Language,
    ) -> Result<VoiceIntent, AdvisorError> {
        let user = format!("Language: {}\nCommand: {transcript}", language.as_str());
        let content = self.chat(VOICE_FORMAT, &user, true).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
