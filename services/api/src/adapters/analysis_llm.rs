//! services/api/src/adapters/analysis_llm.rs
//!
//! This module contains the adapter for the phishing-analysis LLM.
//! It implements the `AnalysisService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You are an email security analyst. You receive the subject line and body of one email and judge how likely it is to be a phishing attempt.

Cross-reference the subject with the body: urgency or threats in the subject combined with requests for credentials, payments, or link clicks in the body are strong indicators.

Respond with ONE JSON object and nothing else, using exactly these fields:
{
  "riskScore": integer from 0 to 100,
  "status": one of "Safe", "Suspicious", "Malicious",
  "redFlags": array of short strings, one per suspicious feature found (empty if none),
  "semanticAnalysis": a short paragraph explaining the verdict,
  "recommendations": array of short, actionable strings for the recipient,
  "classicModelScore": integer from 0 to 100, the score a classic TF-IDF spam classifier would likely give this text
}"#;

use crate::adapters::records::AnalysisRecord;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use phishguard_core::{
    domain::PhishingAnalysis,
    ports::{AnalysisService, PortError, PortResult},
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Matches a reply wrapped in a Markdown code fence.
static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").unwrap());

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `AnalysisService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAnalysisAdapter {
    /// Creates a new `OpenAiAnalysisAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `AnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AnalysisService for OpenAiAnalysisAdapter {
    /// Sends the email to the model once and validates the verdict it returns.
    async fn analyze_email(&self, subject: &str, body: &str) -> PortResult<PhishingAnalysis> {
        let subject_line = if subject.trim().is_empty() {
            "(no subject)"
        } else {
            subject
        };

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!("SUBJECT: {}\n\nBODY:\n{}", subject_line, body))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Map the client error by hand; the orphan rule rules out a `From` impl.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::InvalidResponse(
                    "Analysis LLM response contained no text content.".to_string(),
                )
            })?;

        debug!("Raw analysis reply: {}", content);
        parse_analysis(&content)
    }
}

//=========================================================================================
// Response Parsing
//=========================================================================================

/// Validates a model reply and converts it into a `PhishingAnalysis`.
///
/// The reply may be bare JSON, fenced JSON, or JSON surrounded by prose.
pub fn parse_analysis(raw: &str) -> PortResult<PhishingAnalysis> {
    let json = extract_json(raw)?;
    let record: AnalysisRecord = serde_json::from_str(json)
        .map_err(|e| PortError::InvalidResponse(e.to_string()))?;
    record.to_domain()
}

fn extract_json(raw: &str) -> PortResult<&str> {
    if let Some(body) = FENCED_JSON.captures(raw).and_then(|caps| caps.get(1)) {
        return Ok(body.as_str());
    }

    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&raw[start..=end]),
        _ => Err(PortError::InvalidResponse(
            "Analysis LLM reply did not contain a JSON object.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phishguard_core::domain::DetectionStatus;

    const VERDICT: &str = r#"{"riskScore": 92, "status": "Malicious", "redFlags": ["urgency language", "suspicious link"], "semanticAnalysis": "Classic credential lure.", "recommendations": ["Do not click", "Report to IT"], "classicModelScore": 81}"#;

    #[test]
    fn parses_bare_json() {
        let analysis = parse_analysis(VERDICT).unwrap();
        assert_eq!(analysis.risk_score, 92);
        assert_eq!(analysis.status, DetectionStatus::Malicious);
        assert_eq!(analysis.red_flags, vec!["urgency language", "suspicious link"]);
        assert_eq!(analysis.recommendations, vec!["Do not click", "Report to IT"]);
        assert_eq!(analysis.classic_model_score, Some(81));
    }

    #[test]
    fn parses_fenced_json() {
        let reply = format!("```json\n{}\n```", VERDICT);
        assert_eq!(parse_analysis(&reply).unwrap().risk_score, 92);
    }

    #[test]
    fn parses_untagged_fences_across_calls() {
        for score in [12, 64] {
            let reply = format!("```\n{}\n```", VERDICT.replace("92", &score.to_string()));
            assert_eq!(parse_analysis(&reply).unwrap().risk_score, score);
        }
    }

    #[test]
    fn parses_json_surrounded_by_prose() {
        let reply = format!("Here is my verdict:\n{}\nStay safe!", VERDICT);
        assert_eq!(
            parse_analysis(&reply).unwrap().status,
            DetectionStatus::Malicious
        );
    }

    #[test]
    fn rejects_reply_without_json() {
        assert!(matches!(
            parse_analysis("I cannot help with that."),
            Err(PortError::InvalidResponse(_))
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let reply = r#"{"riskScore": 10, "status": "Safe"}"#;
        assert!(matches!(
            parse_analysis(reply),
            Err(PortError::InvalidResponse(_))
        ));
    }

    #[test]
    fn rejects_unknown_status() {
        let reply = VERDICT.replace("Malicious", "Critical");
        assert!(parse_analysis(&reply).is_err());
    }

    #[test]
    fn rejects_fractional_scores() {
        let reply = VERDICT.replace("92", "92.5");
        assert!(parse_analysis(&reply).is_err());
    }
}
