//! Core types and structures for cricket-diner

use serde::{Deserialize, Serialize};

/// A completed match used as podcast context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
    /// Slug such as "ind-vs-aus-1st-t20i-2025"
    pub id: String,
    pub match_title: String,
    pub venue: String,
    pub result: String,
    pub score_summary: String,
    pub top_performers: Vec<String>,
}

/// One line of a generated script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    /// Speaker name, or a role such as "BREAK", "Announcer" or "AI StatBot"
    pub speaker: String,
    /// Dialogue, opening with a bracketed emotion cue like "[excited]"
    pub line: String,
}

impl TranscriptMessage {
    pub fn new(speaker: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            line: line.into(),
        }
    }
}

/// A podcast participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Speaker {
    pub id: String,
    pub name: String,
}

impl Speaker {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Episode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastConfig {
    pub tone: String,
    pub hosts: Vec<Speaker>,
    pub include_stat_bot: bool,
}

impl PodcastConfig {
    /// A speaker is a host when both id and name match an entry in `hosts`
    pub fn is_host(&self, speaker: &Speaker) -> bool {
        self.hosts
            .iter()
            .any(|h| h.id == speaker.id && h.name == speaker.name)
    }
}

impl Default for PodcastConfig {
    fn default() -> Self {
        Self {
            tone: "Humorous and analytical".to_string(),
            hosts: Vec::new(),
            include_stat_bot: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_data_uses_camel_case() {
        let json = r#"{
            "id": "eng-vs-nz-2nd-odi-2025",
            "matchTitle": "England vs New Zealand, 2nd O-D-I",
            "venue": "Lord's",
            "result": "New Zealand won by 12 runs",
            "scoreSummary": "NZ 289/7 (50), ENG 277 (48.3)",
            "topPerformers": ["Kane Williamson: 104 (118)"]
        }"#;

        let parsed: MatchData = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.match_title, "England vs New Zealand, 2nd O-D-I");
        assert_eq!(parsed.top_performers.len(), 1);

        let back = serde_json::to_value(&parsed).unwrap();
        assert!(back.get("scoreSummary").is_some());
    }

    #[test]
    fn test_host_requires_id_and_name() {
        let config = PodcastConfig {
            hosts: vec![Speaker::new("1", "Harsha")],
            ..Default::default()
        };

        assert!(config.is_host(&Speaker::new("1", "Harsha")));
        assert!(!config.is_host(&Speaker::new("1", "Ravi")));
        assert!(!config.is_host(&Speaker::new("2", "Harsha")));
    }
}
