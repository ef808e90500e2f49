//! Insight extraction: four independent prompt contracts with defensive
//! parsing.
//!
//! Extraction is best-effort by design. A malformed model response, or the
//! generation call failing outright, yields an empty result — never an error,
//! never a retry — so insight quality can degrade without aborting the
//! pipeline. Degradations are logged at `warn`.

use crate::prompts;
use crate::traits::TextGenerator;
use crate::types::{ActionItemDraft, Decision};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

/// Extracts structured insight from a transcript via a text-generation
/// backend. All four operations are independent and individually
/// fault-tolerant.
pub struct InsightExtractor {
    generator: Arc<dyn TextGenerator>,
}

impl InsightExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Action items with assignee/priority/due date where stated.
    pub async fn extract_action_items(&self, transcript: &str) -> Vec<ActionItemDraft> {
        self.extract("action items", prompts::action_items_prompt(transcript))
            .await
    }

    /// Key decisions with context and impact where stated.
    pub async fn extract_decisions(&self, transcript: &str) -> Vec<Decision> {
        self.extract("decisions", prompts::decisions_prompt(transcript))
            .await
    }

    /// Unique speaker/participant names.
    pub async fn identify_participants(&self, transcript: &str) -> Vec<String> {
        self.extract("participants", prompts::participants_prompt(transcript))
            .await
    }

    /// Main topics and themes.
    pub async fn extract_key_topics(&self, transcript: &str) -> Vec<String> {
        self.extract("key topics", prompts::key_topics_prompt(transcript))
            .await
    }

    async fn extract<T: DeserializeOwned>(&self, what: &str, prompt: String) -> Vec<T> {
        let raw = match self.generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("insight: {} generation failed, degrading to empty: {}", what, e);
                return Vec::new();
            }
        };
        match parse_json_array(&raw) {
            Some(items) => items,
            None => {
                warn!("insight: {} response unparseable, degrading to empty", what);
                Vec::new()
            }
        }
    }
}

/// Locate the first `[` and last `]` in `raw` and parse the slice as a JSON
/// array of `T`. Returns `None` if no ordered bracket pair exists or the
/// slice does not parse.
pub fn parse_json_array<T: DeserializeOwned>(raw: &str) -> Option<Vec<T>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use async_trait::async_trait;

    /// Generator returning a canned response (or failing) for every prompt.
    struct CannedGenerator {
        response: Option<String>,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, BridgeError> {
            match &self.response {
                Some(r) => Ok(r.clone()),
                None => Err(BridgeError::ModelUnavailable("canned outage".into())),
            }
        }
    }

    fn extractor(response: Option<&str>) -> InsightExtractor {
        InsightExtractor::new(Arc::new(CannedGenerator {
            response: response.map(String::from),
        }))
    }

    #[test]
    fn parses_array_embedded_in_prose() {
        let raw = "Sure! Here are the topics:\n[\"Budget\", \"Hiring\"]\nHope that helps.";
        let topics: Vec<String> = parse_json_array(raw).unwrap();
        assert_eq!(topics, ["Budget", "Hiring"]);
    }

    #[test]
    fn no_bracket_pair_is_none() {
        assert!(parse_json_array::<String>("no json here").is_none());
        assert!(parse_json_array::<String>("] backwards [").is_none());
    }

    #[test]
    fn invalid_json_inside_brackets_is_none() {
        assert!(parse_json_array::<String>("[not, valid, json]").is_none());
    }

    #[tokio::test]
    async fn malformed_response_degrades_to_empty() {
        let ex = extractor(Some("I could not find any structured data, sorry."));
        assert!(ex.extract_action_items("t").await.is_empty());
        assert!(ex.extract_decisions("t").await.is_empty());
        assert!(ex.identify_participants("t").await.is_empty());
        assert!(ex.extract_key_topics("t").await.is_empty());
    }

    #[tokio::test]
    async fn backend_outage_degrades_to_empty() {
        let ex = extractor(None);
        assert!(ex.extract_action_items("t").await.is_empty());
        assert!(ex.extract_key_topics("t").await.is_empty());
    }

    #[tokio::test]
    async fn well_formed_action_item_round_trips() {
        let transcript = "Alice will send the report by Friday. Bob agreed to review it.";
        let ex = extractor(Some(
            r#"[{"description": "send the report", "assignee": "Alice", "priority": "high", "due_date": "Friday"}]"#,
        ));
        let items = ex.extract_action_items(transcript).await;
        assert_eq!(items.len(), 1);
        assert!(items[0].description.contains("send the report"));
        assert_eq!(items[0].assignee.as_deref(), Some("Alice"));
        assert_eq!(items[0].priority, crate::types::Priority::High);
    }

    #[tokio::test]
    async fn sloppy_records_are_tolerated() {
        let ex = extractor(Some(
            r#"Here you go: [{"description": "follow up"}, {"description": "book room", "priority": "whenever"}]"#,
        ));
        let items = ex.extract_action_items("t").await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].priority, crate::types::Priority::Medium);
    }
}
