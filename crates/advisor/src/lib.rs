//! Financial coaching and voice-intent gateway.
//!
//! The [`Advisor`] never fails: when no provider is configured, or the
//! provider errors, it logs a warning and serves a deterministic fallback.
//! It only ever sees a [`FinancialContext`] summary and holds no handle on
//! the ledger.

use std::sync::Arc;

use async_trait::async_trait;

pub use error::AdvisorError;
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use types::{
    ActivityLine, BalanceLine, FinancialContext, Intent, Language, Tip, VoiceIntent,
    VoiceParameters,
};

mod error;
mod fallback;
mod openai;
mod types;

use types::clamp_confidence;

/// A source of coaching answers.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn daily_tip(&self, ctx: &FinancialContext) -> Result<Tip, AdvisorError>;

    async fn answer(&self, ctx: &FinancialContext, question: &str)
    -> Result<String, AdvisorError>;

    async fn parse_voice(
        &self,
        transcript: &str,
        language: Language,
    ) -> Result<VoiceIntent, AdvisorError>;
}

/// An answer to a free-form question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub response: String,
    pub category: String,
    /// True when the text came from the built-in fallback.
    pub fallback: bool,
}

#[derive(Clone, Default)]
pub struct Advisor {
    provider: Option<Arc<dyn AdviceProvider>>,
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("provider", &self.provider.is_some())
            .finish()
    }
}

impl Advisor {
    pub fn new(provider: Arc<dyn AdviceProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// An advisor that only serves fallbacks.
    pub fn offline() -> Self {
        Self::default()
    }

    pub async fn daily_tip(&self, ctx: &FinancialContext) -> Tip {
        let Some(provider) = &self.provider else {
            return fallback::tip(ctx.language);
        };
        match provider.daily_tip(ctx).await {
            Ok(mut tip) if !tip.tip.trim().is_empty() => {
                tip.confidence = clamp_confidence(tip.confidence);
                tip
            }
            Ok(_) => {
                tracing::warn!("advice provider returned an empty tip; using fallback");
                fallback::tip(ctx.language)
            }
            Err(err) => {
                tracing::warn!("daily tip failed, using fallback: {err}");
                fallback::tip(ctx.language)
            }
        }
    }

    pub async fn answer(&self, ctx: &FinancialContext, question: &str) -> Answer {
        let offline = || Answer {
            response: fallback::answer(ctx.language),
            category: "general".to_string(),
            fallback: true,
        };
        let Some(provider) = &self.provider else {
            return offline();
        };
        match provider.answer(ctx, question).await {
            Ok(response) => Answer {
                response,
                category: "general".to_string(),
                fallback: false,
            },
            Err(err) => {
                tracing::warn!("coaching answer failed, using fallback: {err}");
                offline()
            }
        }
    }

    pub async fn parse_voice(&self, transcript: &str, language: Language) -> VoiceIntent {
        let Some(provider) = &self.provider else {
            return fallback::parse_voice(transcript);
        };
        match provider.parse_voice(transcript, language).await {
            Ok(mut intent) => {
                intent.confidence = clamp_confidence(intent.confidence);
                intent
            }
            Err(err) => {
                tracing::warn!("voice parsing failed, using keyword parser: {err}");
                fallback::parse_voice(transcript)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    #[async_trait]
    impl AdviceProvider for Broken {
        async fn daily_tip(&self, _ctx: &FinancialContext) -> Result<Tip, AdvisorError> {
            Err(AdvisorError::EmptyResponse)
        }

        async fn answer(
            &self,
            _ctx: &FinancialContext,
            _question: &str,
        ) -> Result<String, AdvisorError> {
            Err(AdvisorError::EmptyResponse)
        }

        async fn parse_voice(
            &self,
            _transcript: &str,
            _language: Language,
        ) -> Result<VoiceIntent, AdvisorError> {
            Err(AdvisorError::EmptyResponse)
        }
    }

    struct Overconfident;

    #[async_trait]
    impl AdviceProvider for Overconfident {
        async fn daily_tip(&self, _ctx: &FinancialContext) -> Result<Tip, AdvisorError> {
            Ok(Tip {
                tip: "Track every shilling this week.".to_string(),
                category: "budgeting".to_string(),
                actionable_steps: vec!["Write it down".to_string()],
                confidence: 3.0,
            })
        }

        async fn answer(
            &self,
            _ctx: &FinancialContext,
            question: &str,
        ) -> Result<String, AdvisorError> {
            Ok(format!("echo: {question}"))
        }

        async fn parse_voice(
            &self,
            _transcript: &str,
            _language: Language,
        ) -> Result<VoiceIntent, AdvisorError> {
            Ok(VoiceIntent {
                intent: Intent::Balance,
                action: Intent::Balance.action().to_string(),
                parameters: VoiceParameters::default(),
                confidence: -1.0,
            })
        }
    }

    #[tokio::test]
    async fn failing_provider_falls_back() {
        let advisor = Advisor::new(Arc::new(Broken));
        let ctx = FinancialContext::default();

        let tip = advisor.daily_tip(&ctx).await;
        assert_eq!(tip.category, "savings");
        assert_eq!(tip.actionable_steps.len(), 3);
        assert_eq!(tip.confidence, 0.5);

        let answer = advisor.answer(&ctx, "How do I save?").await;
        assert!(answer.fallback);
        assert!(!answer.response.is_empty());

        let intent = advisor.parse_voice("send 100 to amina", Language::En).await;
        assert_eq!(intent.intent, Intent::Send);
    }

    #[tokio::test]
    async fn offline_advisor_answers_in_swahili() {
        let advisor = Advisor::offline();
        let ctx = FinancialContext {
            language: Language::Sw,
            ..FinancialContext::default()
        };
        let tip = advisor.daily_tip(&ctx).await;
        assert!(tip.tip.starts_with("Jilipe kwanza"));
    }

    #[tokio::test]
    async fn provider_confidence_is_clamped() {
        let advisor = Advisor::new(Arc::new(Overconfident));
        let ctx = FinancialContext::default();

        let tip = advisor.daily_tip(&ctx).await;
        assert_eq!(tip.category, "budgeting");
        assert_eq!(tip.confidence, 1.0);

        let intent = advisor.parse_voice("balance", Language::En).await;
        assert_eq!(intent.confidence, 0.0);

        let answer = advisor.answer(&ctx, "hi").await;
        assert_eq!(answer.response, "echo: hi");
        assert!(!answer.fallback);
    }
}
