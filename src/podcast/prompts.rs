//! Prompt construction for The Cricket Diner

use crate::llm::Schema;
use crate::types::{MatchData, PodcastConfig, Speaker, TranscriptMessage};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const SHOW_NAME: &str = "The Cricket Diner";

/// Behavioural archetypes handed out to speakers by roster position
pub const PERSONAS: [&str; 6] = [
    "The thoughtful, analytical anchor who keeps the conversation on track.",
    "The excitable, passionate commentator who reacts emotionally to big moments.",
    "The cynical ex-player who is hard to impress and focuses on technical flaws.",
    "The optimistic fan-turned-pundit who always sees the bright side.",
    "The data-driven analyst who loves obscure stats and trends.",
    "The host who loves to stir the pot and ask controversial questions.",
];

/// Persona for the speaker at `index` in the roster
pub fn persona_for(index: usize) -> &'static str {
    PERSONAS[index % PERSONAS.len()]
}

/// One "Name (Role): persona" line per speaker
pub fn speaker_profiles(config: &PodcastConfig, speakers: &[Speaker]) -> String {
    speakers
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let role = if config.is_host(s) { "Host" } else { "Guest" };
            format!("{} ({}): {}", s.name, role, persona_for(i))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn topic_instruction(topic: &str, matches: Option<&[MatchData]>) -> String {
    match matches {
        Some(matches) if !matches.is_empty() => {
            let listing = matches
                .iter()
                .map(|m| format!("- **Match:** {}\n  - **Result:** {}", m.match_title, m.result))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "**Podcast Topic:** Deep analysis of the following recent matches:\n{}",
                listing
            )
        }
        _ => format!(
            "**Podcast Topic:** A deep-dive discussion on \"{}\". Explore viewpoints, context, key players, and current trends.",
            topic
        ),
    }
}

fn stat_bot_instruction(include: bool) -> &'static str {
    if include {
        "Include 'AI StatBot' ~5–6 times. Its lines MUST be speaker 'AI StatBot' with ONLY the statistic/fact."
    } else {
        "No AI StatBot in this episode."
    }
}

/// Prompt asking for `count` recent completed matches
pub fn build_matches_prompt(count: usize) -> String {
    format!(
        "Generate {} recent, completed, high-profile international cricket matches (Test, O-D-I, or T-Twenty-I) from the last two months.
Return ONLY a JSON array; each object must include:
- id (slug like \"ind-vs-aus-1st-t20i-2025\")
- matchTitle
- venue
- result
- scoreSummary
- topPerformers (array of strings)",
        count
    )
}

pub fn matches_schema() -> Schema {
    Schema::array(Schema::object([
        ("id", Schema::string()),
        ("matchTitle", Schema::string()),
        ("venue", Schema::string()),
        ("result", Schema::string()),
        ("scoreSummary", Schema::string()),
        ("topPerformers", Schema::array(Schema::string())),
    ]))
}

/// Full seven-act script prompt
pub fn build_script_prompt(
    config: &PodcastConfig,
    topic: &str,
    speakers: &[Speaker],
    matches: Option<&[MatchData]>,
    today: NaiveDate,
) -> String {
    format!(
        "You are an expert cricket podcast script generator for \"{show}\".

{topic}

**Participants & Personas**
{profiles}
- Announcer: voice for teasers and breaks.

**Tone:** {tone}

**Structure (7 acts)**
1) Intro by a host (welcome, introduce all speakers, state topic).
2) Main Discussion 1 (~8–10 lines). A host announces a break at the end.
3) BREAK (speaker \"BREAK\"): list 2–3 upcoming *international* matches after {today} with date/time in EST. Start with an emotion cue in [].
4) Main Discussion 2 (~8–10 lines). A host announces a break at the end.
5) Second BREAK (same rules; different matches if possible).
6) Closing remarks: host asks each guest for final opinion; each responds.
7) Outro + Teaser: host thanks all; 'Announcer' gives a teaser for a fictional next episode.

**Dialogue Rules**
- EVERY line begins with an emotion cue in square brackets (e.g., [excited], [analytical], [skeptical], [chuckling], [thoughtful]).
- Keep personas consistent; use pauses \"...\", reactions, and banter.
- Use phonetics: \"T-Twenty-I\", \"O-D-I\".
- Weave in match analysis: top performers, turning points, tactics.

**AI StatBot**
{stat_bot}

**Output:**
Return ONLY a JSON array of objects:
{{ \"speaker\": string, \"line\": string }}
\"line\" MUST begin with the emotion cue.",
        show = SHOW_NAME,
        topic = topic_instruction(topic, matches),
        profiles = speaker_profiles(config, speakers),
        tone = config.tone,
        today = today.format("%B %-d, %Y"),
        stat_bot = stat_bot_instruction(config.include_stat_bot),
    )
}

pub fn script_schema() -> Schema {
    Schema::array(Schema::object([
        ("speaker", Schema::string()),
        ("line", Schema::string()),
    ]))
}

pub fn build_topics_prompt(count: usize) -> String {
    format!(
        "Generate {} fresh, topical cricket podcast titles.
Use phonetics for terms: \"T-Twenty-I\".
Return ONLY a JSON array of strings.",
        count
    )
}

pub fn topics_schema() -> Schema {
    Schema::array(Schema::string())
}

fn emotion_cue() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[.*?\]\s*").expect("valid regex"))
}

/// Drop the leading "[cue]" token from a dialogue line
pub fn strip_emotion_cue(line: &str) -> &str {
    match emotion_cue().find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Break segments and announcer teasers carry no discussion content
pub fn is_non_dialogue(speaker: &str) -> bool {
    let speaker = speaker.to_lowercase();
    speaker.contains("break") || speaker.contains("announcer")
}

/// "speaker: line" per dialogue message, cues removed, in transcript order
pub fn flatten_transcript(transcript: &[TranscriptMessage]) -> String {
    transcript
        .iter()
        .filter(|t| !is_non_dialogue(&t.speaker))
        .map(|t| format!("{}: {}", t.speaker, strip_emotion_cue(&t.line)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_summary_prompt(transcript: &[TranscriptMessage]) -> String {
    format!(
        "Summarize the following \"{}\" transcript into a concise, well-structured text:
- Heading first
- Bullets or short paragraphs
- Highlight key stats
- Capture final/differing opinions

Transcript:
{}",
        SHOW_NAME,
        flatten_transcript(transcript)
    )
}
