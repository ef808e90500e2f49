//! Insight-extraction prompts: turn a raw transcript into structured JSON.
//!
//! Each prompt embeds the transcript and a literal response-shape instruction;
//! the extractor parses only the bracketed array out of whatever comes back.

/// Template placeholder replaced with the transcript text.
const TRANSCRIPT_SLOT: &str = "{transcript}";

const ACTION_ITEMS_TEMPLATE: &str = r#"Analyze the following meeting transcript and extract all action items.
Return the result as a JSON array where each item has the structure:
{"description": "task description", "assignee": "person name or null", "priority": "high/medium/low", "due_date": "mentioned date or null"}

Transcript:
{transcript}

Action items (JSON only):"#;

const DECISIONS_TEMPLATE: &str = r#"Analyze the following meeting transcript and extract all key decisions made.
Return as JSON array with structure: {"decision": "description", "context": "background", "impact": "potential impact"}

Transcript:
{transcript}

Decisions (JSON only):"#;

const PARTICIPANTS_TEMPLATE: &str = r#"Identify all unique speakers/participants mentioned in this meeting transcript.
Return only a JSON array of names: ["Name1", "Name2", ...]

Transcript:
{transcript}

Participants (JSON only):"#;

const KEY_TOPICS_TEMPLATE: &str = r#"Identify the main topics and themes discussed in this meeting.
Return as JSON array: ["Topic 1", "Topic 2", ...]

Transcript:
{transcript}

Key topics (JSON only):"#;

/// Build the action-items prompt for the given transcript.
pub fn action_items_prompt(transcript: &str) -> String {
    ACTION_ITEMS_TEMPLATE.replace(TRANSCRIPT_SLOT, transcript)
}

/// Build the decisions prompt for the given transcript.
pub fn decisions_prompt(transcript: &str) -> String {
    DECISIONS_TEMPLATE.replace(TRANSCRIPT_SLOT, transcript)
}

/// Build the participants prompt for the given transcript.
pub fn participants_prompt(transcript: &str) -> String {
    PARTICIPANTS_TEMPLATE.replace(TRANSCRIPT_SLOT, transcript)
}

/// Build the key-topics prompt for the given transcript.
pub fn key_topics_prompt(transcript: &str) -> String {
    KEY_TOPICS_TEMPLATE.replace(TRANSCRIPT_SLOT, transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_transcript() {
        let t = "Alice will send the report by Friday.";
        for prompt in [
            action_items_prompt(t),
            decisions_prompt(t),
            participants_prompt(t),
            key_topics_prompt(t),
        ] {
            assert!(prompt.contains(t));
            assert!(prompt.contains("JSON"));
            assert!(!prompt.contains(TRANSCRIPT_SLOT));
        }
    }
}
