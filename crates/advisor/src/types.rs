use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Sw,
}

impl Language {
    /// Parses a language tag; anything unsupported falls back to English.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "sw" | "swahili" | "kiswahili" => Self::Sw,
            _ => Self::En,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Sw => "sw",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Sw => "Swahili",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub tip: String,
    pub category: String,
    pub actionable_steps: Vec<String>,
    pub confidence: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Send,
    Balance,
    Convert,
    Request,
    Unknown,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Balance => "balance",
            Self::Convert => "convert",
            Self::Request => "request",
            Self::Unknown => "unknown",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Self::Send => "send_money",
            Self::Balance => "check_balance",
            Self::Convert => "convert_currency",
            Self::Request => "request_money",
            Self::Unknown => "none",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

/// What a transcript asks for. Parsing never executes anything; a client
/// turns a confirmed intent into an ordinary transfer or conversion call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceIntent {
    pub intent: Intent,
    pub action: String,
    #[serde(default)]
    pub parameters: VoiceParameters,
    pub confidence: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceLine {
    pub currency: String,
    pub amount: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityLine {
    pub kind: String,
    pub amount: String,
    pub currency: String,
    pub status: String,
}

/// Read-only summary of a user's money handed to the provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FinancialContext {
    pub language: Language,
    pub balances: Vec<BalanceLine>,
    pub recent: Vec<ActivityLine>,
}

impl FinancialContext {
    pub(crate) fn prompt(&self) -> String {
        let mut out = format!("Reply in {}.\n", self.language.name());
        if self.balances.is_empty() {
            out.push_str("The user has no wallets yet.\n");
        } else {
            out.push_str("Balances:\n");
            for line in &self.balances {
                let _ = writeln!(out, "- {} {}", line.amount, line.currency);
            }
        }
        if !self.recent.is_empty() {
            out.push_str("Recent transactions:\n");
            for line in &self.recent {
                let _ = writeln!(
                    out,
                    "- {} {} {} ({})",
                    line.kind, line.amount, line.currency, line.status
                );
            }
        }
        out
    }
}

pub(crate) fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
