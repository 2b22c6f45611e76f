//! Cricket Diner - AI-generated cricket podcast content
//!
//! Command-line front end for fetching recent matches, brainstorming topics,
//! writing full episode scripts and summarizing them.

use cricket_diner::{
    ContentGenerator, DinerError, GeminiConfig, MatchData, PodcastConfig, Result, Speaker,
    TranscriptMessage, DEFAULT_MATCH_COUNT, DEFAULT_TOPIC_COUNT,
};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{MultiSelect, Select, Text};
use rand::seq::SliceRandom;
use std::env;
use std::future::Future;
use std::path::Path;
use std::process;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = cricket_diner::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();

    if args.first().map_or(false, |a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if let Err(e) = run(&args).await {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<()> {
    let config = GeminiConfig::from_env()?;
    let generator = ContentGenerator::from_config(&config)?;

    let Some((command, rest)) = args.split_first() else {
        return run_interactive(&generator).await;
    };

    match command.as_str() {
        "matches" => show_matches(&generator, parse_count(rest, DEFAULT_MATCH_COUNT)?).await,
        "topics" => show_topics(&generator, parse_count(rest, DEFAULT_TOPIC_COUNT)?).await,
        "script" => run_script(&generator, ScriptOptions::parse(rest)?).await,
        "summary" => {
            let path = rest
                .first()
                .ok_or_else(|| DinerError::cli("summary needs a transcript JSON file"))?;
            show_summary(&generator, Path::new(path)).await
        }
        other => Err(DinerError::cli(format!("Unknown command: {}", other))),
    }
}

/// Menu shown when no command is given
async fn run_interactive(generator: &ContentGenerator) -> Result<()> {
    println!("🏏 The Cricket Diner - podcast studio");
    println!("═════════════════════════════════════");
    println!();

    let choices = vec![
        "🏟️  Recent matches",
        "💡 Topic ideas",
        "🎙️  Generate a script",
        "📝 Summarize a transcript",
    ];

    let choice = Select::new("What would you like to do?", choices)
        .prompt()
        .map_err(|e| DinerError::cli(e.to_string()))?;

    if choice.contains("Recent matches") {
        show_matches(generator, DEFAULT_MATCH_COUNT).await
    } else if choice.contains("Topic ideas") {
        show_topics(generator, DEFAULT_TOPIC_COUNT).await
    } else if choice.contains("script") {
        let topic = Text::new("Topic (leave empty for a surprise):")
            .prompt()
            .map_err(|e| DinerError::cli(e.to_string()))?;
        let options = ScriptOptions {
            topic: topic.trim().to_string(),
            ..Default::default()
        };
        run_script(generator, options).await
    } else {
        let path = Text::new("Transcript JSON file:")
            .prompt()
            .map_err(|e| DinerError::cli(e.to_string()))?;
        show_summary(generator, Path::new(path.trim())).await
    }
}

fn parse_count(rest: &[String], default: usize) -> Result<usize> {
    match rest.first() {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(DinerError::cli(format!("Expected a positive count, got '{}'", raw))),
        },
    }
}

/// Options for the `script` command
#[derive(Debug, Default)]
struct ScriptOptions {
    topic: String,
    tone: Option<String>,
    stat_bot: bool,
    use_matches: bool,
    out: Option<String>,
}

impl ScriptOptions {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Self::default();
        let mut topic_words = Vec::new();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--statbot" => options.stat_bot = true,
                "--matches" => options.use_matches = true,
                "--tone" => {
                    let tone = iter
                        .next()
                        .ok_or_else(|| DinerError::cli("--tone needs a value"))?;
                    options.tone = Some(tone.clone());
                }
                "--out" => {
                    let out = iter
                        .next()
                        .ok_or_else(|| DinerError::cli("--out needs a file path"))?;
                    options.out = Some(out.clone());
                }
                flag if flag.starts_with("--") => {
                    return Err(DinerError::cli(format!("Unknown option: {}", flag)));
                }
                word => topic_words.push(word),
            }
        }

        options.topic = topic_words.join(" ");
        Ok(options)
    }
}

/// Default panel: two hosts, two guests
fn default_roster() -> Vec<Speaker> {
    vec![
        Speaker::new("1", "Harsha"),
        Speaker::new("2", "Isa"),
        Speaker::new("3", "Nasser"),
        Speaker::new("4", "Ravi"),
    ]
}

/// Run `task` behind a spinner
async fn with_spinner<T, F>(message: &str, task: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;
    spinner.finish_and_clear();
    result
}

async fn show_matches(generator: &ContentGenerator, count: usize) -> Result<()> {
    let matches = with_spinner("🤖 Fetching recent matches...", generator.fetch_recent_matches(count)).await;
    display_matches(&matches);
    Ok(())
}

fn display_matches(matches: &[MatchData]) {
    println!();
    println!("🏟️  Recent Matches ({}):", matches.len());
    println!("═══════════════════════");
    for (i, m) in matches.iter().enumerate() {
        println!("{:2}. {}", i + 1, m.match_title);
        println!("    📍 {}", m.venue);
        println!("    🏆 {}", m.result);
        println!("    📊 {}", m.score_summary);
        if !m.top_performers.is_empty() {
            println!("    ⭐ {}", m.top_performers.join(", "));
        }
        println!();
    }
}

async fn show_topics(generator: &ContentGenerator, count: usize) -> Result<()> {
    let topics = with_spinner("🤖 Brainstorming topics...", generator.generate_topic_suggestions(count)).await?;

    println!();
    println!("💡 Topic Ideas ({}):", topics.len());
    println!("══════════════════");
    for (i, topic) in topics.iter().enumerate() {
        println!("{:2}. {}", i + 1, topic);
    }
    println!();
    Ok(())
}

async fn run_script(generator: &ContentGenerator, options: ScriptOptions) -> Result<()> {
    let speakers = default_roster();
    let config = PodcastConfig {
        tone: options
            .tone
            .clone()
            .unwrap_or_else(|| PodcastConfig::default().tone),
        hosts: speakers[..2].to_vec(),
        include_stat_bot: options.stat_bot,
    };

    let matches = if options.use_matches {
        let available = with_spinner(
            "🤖 Fetching recent matches...",
            generator.fetch_recent_matches(DEFAULT_MATCH_COUNT),
        )
        .await;
        Some(pick_matches(available)?)
    } else {
        None
    };

    let mut topic = options.topic.clone();
    if topic.is_empty() && matches.as_ref().map_or(true, |m| m.is_empty()) {
        let topics = with_spinner(
            "🎲 Picking a topic...",
            generator.generate_topic_suggestions(DEFAULT_TOPIC_COUNT),
        )
        .await?;
        topic = topics
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| DinerError::parse("Model returned no topics", None))?;
        println!("🎲 Topic: \"{}\"", topic);
    }

    let transcript = with_spinner(
        "🎙️  Writing the episode...",
        generator.generate_podcast_script(&config, &topic, &speakers, matches.as_deref()),
    )
    .await?;

    display_transcript(&transcript);

    if let Some(path) = &options.out {
        write_transcript(Path::new(path), &transcript)?;
        println!("💾 Saved transcript to {}", path);
    }

    Ok(())
}

fn pick_matches(available: Vec<MatchData>) -> Result<Vec<MatchData>> {
    let labels: Vec<String> = available
        .iter()
        .map(|m| format!("{} ({})", m.match_title, m.result))
        .collect();

    let picked = MultiSelect::new("Which matches should the episode cover?", labels)
        .raw_prompt()
        .map_err(|e| DinerError::cli(e.to_string()))?;

    Ok(picked
        .into_iter()
        .filter_map(|option| available.get(option.index).cloned())
        .collect())
}

fn display_transcript(transcript: &[TranscriptMessage]) {
    println!();
    println!("🎙️  Episode Script ({} lines):", transcript.len());
    println!("════════════════════════════");
    for message in transcript {
        println!("{:>12}: {}", message.speaker, message.line);
    }
    println!();
}

async fn show_summary(generator: &ContentGenerator, path: &Path) -> Result<()> {
    let transcript = read_transcript(path)?;
    let summary = with_spinner("📝 Summarizing...", generator.generate_podcast_summary(&transcript)).await?;

    println!();
    println!("{}", summary);
    println!();
    Ok(())
}

fn read_transcript(path: &Path) -> Result<Vec<TranscriptMessage>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| DinerError::io(e.to_string(), Some(path.display().to_string())))?;
    serde_json::from_str(&raw).map_err(|e| {
        DinerError::parse(format!("Invalid transcript file: {}", e), Some(path.display().to_string()))
    })
}

fn write_transcript(path: &Path, transcript: &[TranscriptMessage]) -> Result<()> {
    let json = serde_json::to_string_pretty(transcript)?;
    std::fs::write(path, json)
        .map_err(|e| DinerError::io(e.to_string(), Some(path.display().to_string())))
}

/// Print help information
fn print_help() {
    println!("🏏 The Cricket Diner - AI-generated cricket podcast content");
    println!("══════════════════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    cricket-diner [COMMAND] [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    matches [N]                 Show N recent matches (default: {})", DEFAULT_MATCH_COUNT);
    println!("    topics [N]                  Suggest N episode topics (default: {})", DEFAULT_TOPIC_COUNT);
    println!("    script [TOPIC] [OPTIONS]    Write a full episode script");
    println!("        --tone TONE             Episode tone");
    println!("        --statbot               Let AI StatBot chip in with facts");
    println!("        --matches               Pick recent matches to discuss");
    println!("        --out FILE              Save the transcript as JSON");
    println!("    summary FILE                Summarize a saved transcript");
    println!();
    println!("    With no command an interactive menu is shown.");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    GEMINI_API_KEY       Google Gemini API key (required)");
    println!("    GEMINI_MODEL         Preferred model (default: gemini-1.5-flash)");
    println!("    GEMINI_BASE_URL      API base URL");
    println!("    GEMINI_TIMEOUT_SECS  HTTP timeout in seconds (default: 60)");
    println!("    RUST_LOG             Log filter (default: warn)");
    println!();
    println!("Made with ❤️ and 🦀 Rust");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_script_options() {
        let options = ScriptOptions::parse(&args(&[
            "Spin", "--tone", "Fiery", "twins", "--statbot", "--out", "ep.json",
        ]))
        .unwrap();

        assert_eq!(options.topic, "Spin twins");
        assert_eq!(options.tone.as_deref(), Some("Fiery"));
        assert!(options.stat_bot);
        assert!(!options.use_matches);
        assert_eq!(options.out.as_deref(), Some("ep.json"));
    }

    #[test]
    fn test_script_options_errors() {
        assert!(ScriptOptions::parse(&args(&["--tone"])).is_err());
        assert!(ScriptOptions::parse(&args(&["--loud"])).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&[], 7).unwrap(), 7);
        assert_eq!(parse_count(&args(&["3"]), 7).unwrap(), 3);
        assert!(parse_count(&args(&["0"]), 7).is_err());
        assert!(parse_count(&args(&["many"]), 7).is_err());
    }

    #[test]
    fn test_transcript_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.json");
        let transcript = vec![TranscriptMessage::new("Harsha", "[excited] Welcome!")];

        write_transcript(&path, &transcript).unwrap();
        assert_eq!(read_transcript(&path).unwrap(), transcript);
    }
}
