//! Sequential model fallback and response clean-up

use crate::error::{DinerError, Result};
use regex::Regex;
use std::future::Future;
use std::sync::OnceLock;
use std::time::Instant;

/// Try `attempt` against each candidate in order and return the first success.
///
/// Each candidate is tried exactly once. A failed attempt is logged as a
/// warning and the next candidate is tried; when every candidate fails the
/// last error is returned inside [`DinerError::AllModelsFailed`].
pub async fn first_success<T, F, Fut>(candidates: &[String], mut attempt: F) -> Result<T>
where
    F: FnMut(&str) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;
    let overall_start = Instant::now();

    for (index, model) in candidates.iter().enumerate() {
        match attempt(model).await {
            Ok(value) => {
                tracing::info!(
                    model = %model,
                    fallback_used = index > 0,
                    duration_ms = %overall_start.elapsed().as_millis(),
                    "Model responded"
                );
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(model = %model, error = %e, "Model failed, trying next");
                last_error = Some(e);
            }
        }
    }

    Err(DinerError::all_models_failed(last_error))
}

fn open_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*```(?:json)?\s*").expect("valid regex"))
}

fn close_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*```\s*$").expect("valid regex"))
}

/// Remove markdown code fences wrapped around model output, however deeply nested
pub fn strip_fences(text: &str) -> String {
    let mut current = text.trim().to_string();
    loop {
        let without_open = open_fence().replace(&current, "");
        let stripped = close_fence().replace(&without_open, "").trim().to_string();
        if stripped == current {
            return stripped;
        }
        current = stripped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::{Arc, Mutex};

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_fences("```json\n[1,2]\n```"), "[1,2]");
        assert_eq!(strip_fences("```JSON [1,2] ```"), "[1,2]");
        assert_eq!(strip_fences("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_fences_leaves_plain_text() {
        assert_eq!(strip_fences("  # Heading\n- point  "), "# Heading\n- point");
        assert_eq!(strip_fences("[\"a\"]"), "[\"a\"]");
    }

    #[test]
    fn test_strip_fences_idempotent() {
        for input in [
            "```json\n[1,2]\n```",
            "```\nhello\n```",
            "plain",
            "``` ```",
            "```json\n```json\n[1,2]\n```\n```",
            "```\n```JSON\n```\n{}\n```\n```\n```",
        ] {
            let once = strip_fences(input);
            assert_eq!(strip_fences(&once), once);
        }
    }

    #[test]
    fn test_strip_nested_fences() {
        assert_eq!(strip_fences("```json\n```json\n[1,2]\n```\n```"), "[1,2]");
    }

    #[test]
    fn test_first_model_wins() {
        let calls = RefCell::new(Vec::new());
        let result = tokio_test::block_on(first_success(&models(&["a", "b", "c"]), |m| {
            calls.borrow_mut().push(m.to_string());
            async { Ok::<_, DinerError>(42) }
        }));

        assert_eq!(result.unwrap(), 42);
        assert_eq!(*calls.borrow(), vec!["a"]);
    }

    #[test]
    fn test_falls_through_in_order() {
        let calls = RefCell::new(Vec::new());
        let result = tokio_test::block_on(first_success(&models(&["a", "b", "c"]), |m| {
            calls.borrow_mut().push(m.to_string());
            let model = m.to_string();
            async move {
                if model == "c" {
                    Ok(model)
                } else {
                    Err(DinerError::model_invocation(model, "unavailable", Some(503)))
                }
            }
        }));

        assert_eq!(result.unwrap(), "c");
        assert_eq!(*calls.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_returns_last_error() {
        let result: Result<()> = tokio_test::block_on(first_success(&models(&["a", "b"]), |m| {
            let model = m.to_string();
            async move { Err(DinerError::model_invocation(model, "nope", None)) }
        }));

        let err = result.unwrap_err();
        match err.last_attempt() {
            Some(DinerError::ModelInvocation { model, .. }) => assert_eq!(model, "b"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[test]
    fn test_warns_once_per_failed_model() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || {
            tokio_test::block_on(first_success(&models(&["flash", "flash-8b", "pro"]), |m| {
                let model = m.to_string();
                async move {
                    if model == "pro" {
                        Ok(model)
                    } else {
                        Err(DinerError::model_invocation(model, "overloaded", Some(503)))
                    }
                }
            }))
        });

        assert_eq!(result.unwrap(), "pro");

        let warnings: Vec<String> = logs
            .lines()
            .into_iter()
            .filter(|l| l.contains("WARN") && l.contains("Model failed, trying next"))
            .collect();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("model=flash "));
        assert!(warnings[1].contains("model=flash-8b "));
    }

    #[test]
    fn test_empty_candidates() {
        let result: Result<()> =
            tokio_test::block_on(first_success(&[], |_| async { Ok(()) }));
        let err = result.unwrap_err();
        assert!(matches!(err, DinerError::AllModelsFailed { last: None }));
    }
}
