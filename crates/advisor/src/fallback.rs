//! Deterministic answers used when no provider is configured or it fails.

use crate::{Intent, Language, Tip, VoiceIntent, VoiceParameters};

const CURRENCY_CODES: [&str; 9] = [
    "kes", "usd", "eur", "ngn", "ghs", "zar", "btc", "eth", "usdt",
];

pub(crate) fn tip(language: Language) -> Tip {
    let (tip, steps) = match language {
        Language::En => (
            "Pay yourself first: move a fixed share of every income into savings before spending.",
            [
                "Pick a share of each income to save, even 10%.",
                "Move it the day the money arrives.",
                "Review your spending at the end of the week.",
            ],
        ),
        Language::Sw => (
            "Jilipe kwanza: weka sehemu ya kila mapato kwenye akiba kabla ya kutumia.",
            [
                "Chagua sehemu ya kila mapato ya kuweka akiba, hata 10%.",
                "Ihamishe siku pesa inapoingia.",
                "Pitia matumizi yako mwisho wa wiki.",
            ],
        ),
    };
    Tip {
        tip: tip.to_string(),
        category: "savings".to_string(),
        actionable_steps: steps.iter().map(ToString::to_string).collect(),
        confidence: 0.5,
    }
}

pub(crate) fn answer(language: Language) -> String {
    match language {
        Language::En => "I can't reach the coaching service right now. A good rule meanwhile: \
                         keep an emergency fund of three months of expenses before taking on \
                         new commitments."
            .to_string(),
        Language::Sw => "Siwezi kufikia huduma ya ushauri sasa hivi. Kwa sasa: weka akiba ya \
                         dharura ya matumizi ya miezi mitatu kabla ya kuchukua majukumu mapya."
            .to_string(),
    }
}

/// Keyword intent parser for English and Swahili transcripts.
///
/// Confidence grows with the number of parameters found and never exceeds
/// `0.8`, so a provider answer always outranks it.
pub(crate) fn parse_voice(transcript: &str) -> VoiceIntent {
    let lower = transcript.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || c == ',' || c == '?' || c == '!')
        .filter(|w| !w.is_empty())
        .collect();
    let has = |keys: &[&str]| words.iter().any(|w| keys.contains(w));

    let intent = if has(&["convert", "exchange", "badilisha"]) {
        Intent::Convert
    } else if has(&["request", "ask", "omba"]) {
        Intent::Request
    } else if has(&["send", "pay", "transfer", "tuma", "lipa"]) {
        Intent::Send
    } else if has(&["balance", "salio"]) || lower.contains("how much") {
        Intent::Balance
    } else {
        Intent::Unknown
    };

    if intent == Intent::Unknown {
        return VoiceIntent {
            intent,
            action: intent.action().to_string(),
            parameters: VoiceParameters::default(),
            confidence: 0.0,
        };
    }

    let parameters = VoiceParameters {
        amount: words.iter().find_map(|w| amount(w)),
        currency: words.iter().find_map(|w| currency(w)),
        recipient: recipient(&words),
    };
    let found = [
        parameters.amount.is_some(),
        parameters.currency.is_some(),
        parameters.recipient.is_some(),
    ]
    .into_iter()
    .filter(|hit| *hit)
    .count();

    VoiceIntent {
        intent,
        action: intent.action().to_string(),
        parameters,
        confidence: (0.5 + 0.1 * found as f64).min(0.8),
    }
}

fn amount(word: &str) -> Option<String> {
    let digits = word
        .trim_start_matches("ksh")
        .trim_start_matches("kes")
        .trim_start_matches('$')
        .replace('_', "");
    let mut dots = 0;
    let valid = !digits.is_empty()
        && digits.chars().all(|c| {
            if c == '.' {
                dots += 1;
                true
            } else {
                c.is_ascii_digit()
            }
        })
        && dots <= 1
        && !digits.starts_with('.')
        && !digits.ends_with('.');
    valid.then_some(digits)
}

fn currency(word: &str) -> Option<String> {
    if CURRENCY_CODES.contains(&word) {
        return Some(word.to_uppercase());
    }
    match word {
        "shillings" | "shilingi" | "bob" | "ksh" => Some("KES".to_string()),
        "dollars" | "dola" => Some("USD".to_string()),
        "bitcoin" => Some("BTC".to_string()),
        _ => None,
    }
}

fn recipient(words: &[&str]) -> Option<String> {
    words
        .windows(2)
        .find(|pair| matches!(pair[0], "to" | "from" | "kwa"))
        .map(|pair| pair[1])
        .filter(|name| amount(name).is_none() && currency(name).is_none())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_with_amount_and_recipient() {
        let intent = parse_voice("Send 500 shillings to Wanjiru");
        assert_eq!(intent.intent, Intent::Send);
        assert_eq!(intent.action, "send_money");
        assert_eq!(intent.parameters.amount.as_deref(), Some("500"));
        assert_eq!(intent.parameters.currency.as_deref(), Some("KES"));
        assert_eq!(intent.parameters.recipient.as_deref(), Some("wanjiru"));
        assert!((intent.confidence - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn swahili_keywords() {
        let intent = parse_voice("tuma 1200.50 kwa baraka");
        assert_eq!(intent.intent, Intent::Send);
        assert_eq!(intent.parameters.amount.as_deref(), Some("1200.50"));
        assert_eq!(intent.parameters.recipient.as_deref(), Some("baraka"));

        assert_eq!(parse_voice("salio langu ni ngapi?").intent, Intent::Balance);
        assert_eq!(parse_voice("omba 300 kwa amina").intent, Intent::Request);
    }

    #[test]
    fn convert_wins_over_send_words() {
        let intent = parse_voice("convert 1000 kes to btc");
        assert_eq!(intent.intent, Intent::Convert);
        assert_eq!(intent.parameters.amount.as_deref(), Some("1000"));
        assert_eq!(intent.parameters.currency.as_deref(), Some("KES"));
        // "btc" after "to" is a currency, not a person.
        assert_eq!(intent.parameters.recipient, None);
    }

    #[test]
    fn balance_question() {
        let intent = parse_voice("How much do I have?");
        assert_eq!(intent.intent, Intent::Balance);
        assert_eq!(intent.action, "check_balance");
        assert!((intent.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unrecognized_speech_is_unknown() {
        let intent = parse_voice("play some music");
        assert_eq!(intent.intent, Intent::Unknown);
        assert_eq!(intent.action, "none");
        assert_eq!(intent.confidence, 0.0);
        assert_eq!(intent.parameters, VoiceParameters::default());
    }

    #[test]
    fn fallback_tip_shape() {
        for language in [Language::En, Language::Sw] {
            let tip = tip(language);
            assert_eq!(tip.category, "savings");
            assert_eq!(tip.actionable_steps.len(), 3);
            assert_eq!(tip.confidence, 0.5);
            assert!(!answer(language).is_empty());
        }
    }
}
