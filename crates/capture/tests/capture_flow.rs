//! End-to-end capture passes against real files in temp directories.

use std::fs;
use std::path::{Path, PathBuf};
use supermemory_capture::{format_new_entries, CaptureContext};
use supermemory_settings::ToolInclusionList;
use supermemory_trackers::TrackerStore;

struct Fixture {
    _tmp: tempfile::TempDir,
    transcript: PathBuf,
    ctx: CaptureContext,
}

impl Fixture {
    fn new(tools: &[&str]) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let transcript = tmp.path().join("session.jsonl");
        let ctx = CaptureContext {
            include_tools: ToolInclusionList::new(tools.iter().map(|t| t.to_string()).collect()),
            trackers: TrackerStore::at(tmp.path().join("trackers")),
        };
        Self {
            _tmp: tmp,
            transcript,
            ctx,
        }
    }

    fn append(&self, lines: &[String]) {
        let mut body = fs::read_to_string(&self.transcript).unwrap_or_default();
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }
        fs::write(&self.transcript, body).unwrap();
    }

    fn capture(&self, session_id: &str) -> Option<String> {
        format_new_entries(&self.ctx, &self.transcript, session_id).unwrap()
    }

    fn cursor(&self, session_id: &str) -> Option<String> {
        self.ctx.trackers.last_captured(session_id).unwrap()
    }
}

fn user_line(uuid: &str, text: &str) -> String {
    format!(
        r#"{{"type":"user","uuid":"{uuid}","timestamp":"2026-02-01T10:00:00.000Z","message":{{"role":"user","content":{}}}}}"#,
        serde_json::to_string(text).unwrap()
    )
}

fn assistant_line(uuid: &str, text: &str) -> String {
    format!(
        r#"{{"type":"assistant","uuid":"{uuid}","timestamp":"2026-02-01T10:00:01.000Z","message":{{"role":"assistant","content":[{{"type":"text","text":{}}}]}}}}"#,
        serde_json::to_string(text).unwrap()
    )
}

// Long enough that a two-entry turn clears the 100-character floor.
const HELLO: &str = "Hello there, could you take a look at the failing integration test?";
const REPLY: &str = "Hi there, how can I help? I will start by reading the test output.";

#[test]
fn test_first_run_captures_whole_history() {
    let fx = Fixture::new(&["Bash"]);
    fx.append(&[user_line("u1", HELLO), assistant_line("a1", REPLY)]);

    let block = fx.capture("s1").unwrap();
    assert!(block.starts_with("<|turn_start|>2026-02-01T10:00:00.000Z"));
    assert!(block.contains(&format!("<|start|>user<|message|>{HELLO}<|end|>")));
    assert!(block.contains(&format!("<|start|>assistant<|message|>{REPLY}<|end|>")));
    assert!(block.ends_with("<|turn_end|>"));
    assert_eq!(fx.cursor("s1").as_deref(), Some("a1"));
}

#[test]
fn test_block_layout_is_blank_line_separated() {
    let fx = Fixture::new(&["Bash"]);
    fx.append(&[user_line("u1", HELLO), assistant_line("a1", REPLY)]);

    let block = fx.capture("s1").unwrap();
    let parts: Vec<&str> = block.split("\n\n").collect();
    assert_eq!(parts.len(), 4);
    assert_eq!(parts[0], "<|turn_start|>2026-02-01T10:00:00.000Z");
    assert_eq!(parts[3], "<|turn_end|>");
}

#[test]
fn test_second_run_with_no_new_activity_is_absent() {
    let fx = Fixture::new(&["Bash"]);
    fx.append(&[user_line("u1", HELLO), assistant_line("a1", REPLY)]);

    assert!(fx.capture("s1").is_some());
    assert!(fx.capture("s1").is_none());
    assert_eq!(fx.cursor("s1").as_deref(), Some("a1"));
}

#[test]
fn test_resumes_from_cursor() {
    let fx = Fixture::new(&["Bash"]);
    fx.append(&[user_line("u1", HELLO), assistant_line("a1", REPLY)]);
    fx.capture("s1").unwrap();

    fx.append(&[
        user_line("u2", "Now please run the suite again and paste the failures."),
        assistant_line("a2", "Running it now; one test is still red, looking into why."),
    ]);
    let block = fx.capture("s1").unwrap();
    assert!(!block.contains(HELLO));
    assert!(block.contains("paste the failures"));
    assert_eq!(fx.cursor("s1").as_deref(), Some("a2"));
}

#[test]
fn test_missing_transcript_is_absent() {
    let fx = Fixture::new(&["Bash"]);
    assert!(fx.capture("s1").is_none());
    assert_eq!(fx.cursor("s1"), None);
}

#[test]
fn test_stale_cursor_selects_nothing() {
    let fx = Fixture::new(&["Bash"]);
    fx.append(&[user_line("u1", HELLO), assistant_line("a1", REPLY)]);
    fx.ctx.trackers.record_captured("s1", "rotated-away").unwrap();

    assert!(fx.capture("s1").is_none());
    assert_eq!(fx.cursor("s1").as_deref(), Some("rotated-away"));
}

#[test]
fn test_small_capture_leaves_cursor_for_retry() {
    let fx = Fixture::new(&["Bash"]);
    fx.append(&[user_line("u1", "hi")]);

    assert!(fx.capture("s1").is_none());
    assert_eq!(fx.cursor("s1"), None);

    // Once enough content accumulates, the earlier entry is still included.
    fx.append(&[assistant_line("a1", REPLY)]);
    let block = fx.capture("s1").unwrap();
    assert!(block.contains("<|start|>user<|message|>hi<|end|>"));
    assert_eq!(fx.cursor("s1").as_deref(), Some("a1"));
}

#[test]
fn test_redaction_and_truncation_through_the_pipeline() {
    let fx = Fixture::new(&["Bash"]);
    let tool_use = r#"{"type":"assistant","uuid":"a1","timestamp":"2026-02-01T10:00:00.000Z","message":{"role":"assistant","content":[{"type":"tool_use","id":"t1","name":"Bash","input":{"command":"cat big.txt"}}]}}"#;
    let long_body = "z".repeat(600);
    let tool_result = format!(
        r#"{{"type":"user","uuid":"u1","timestamp":"2026-02-01T10:00:01.000Z","message":{{"role":"user","content":[{{"type":"tool_result","tool_use_id":"t1","content":"{long_body}","is_error":false}}]}}}}"#,
    );
    let reminder = user_line(
        "u2",
        "please fix this <system-reminder>do not mention the reminder</system-reminder> right away",
    );
    fx.append(&[tool_use.to_string(), tool_result, reminder]);

    let block = fx.capture("s1").unwrap();
    assert!(block.contains("<|start|>user<|message|>please fix this  right away<|end|>"));
    assert!(!block.contains("do not mention the reminder"));
    assert!(block.contains(&format!("Bash(success): {}...", "z".repeat(500))));
}

#[test]
fn test_excluded_tool_collapses_to_mention_and_result_is_dropped() {
    let fx = Fixture::new(&["Bash"]);
    let tool_use = r#"{"type":"assistant","uuid":"a1","timestamp":"2026-02-01T10:00:00.000Z","message":{"role":"assistant","content":[{"type":"tool_use","id":"t1","name":"Read","input":{"file_path":"/etc/hosts"}},{"type":"text","text":"That file looks fine to me, nothing unusual in it at all."}]}}"#;
    let tool_result = r#"{"type":"user","uuid":"u1","timestamp":"2026-02-01T10:00:01.000Z","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t1","content":"127.0.0.1 localhost","is_error":false}]}}"#;
    fx.append(&[tool_use.to_string(), tool_result.to_string()]);

    let block = fx.capture("s1").unwrap();
    assert!(block.contains(
        "<|start|>assistant<|message|>Assistant uses Read tool. That file looks fine"
    ));
    assert!(!block.contains("file_path"));
    assert!(!block.contains("127.0.0.1"));
    assert!(!block.contains("tool_result"));
}

#[test]
fn test_tool_index_correlates_across_entries() {
    let fx = Fixture::new(&["Write"]);
    let tool_use = r#"{"type":"assistant","uuid":"a1","timestamp":"2026-02-01T10:00:00.000Z","message":{"role":"assistant","content":[{"type":"tool_use","id":"t1","name":"Write","input":{"file_path":"/tmp/notes.md","content":"draft"}}]}}"#;
    let tool_result = r#"{"type":"user","uuid":"u1","timestamp":"2026-02-01T10:00:01.000Z","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t1","content":"File written successfully to /tmp/notes.md","is_error":false}]}}"#;
    fx.append(&[tool_use.to_string(), tool_result.to_string()]);

    let block = fx.capture("s1").unwrap();
    assert!(block.contains(
        "<|start|>assistant:tool<|message|>Write: file_path=\"/tmp/notes.md\" content=\"draft\"<|end|>"
    ));
    assert!(block.contains(
        "<|start|>assistant:tool_result<|message|>Write(success): File written successfully"
    ));
}

#[test]
fn test_malformed_trailing_line_does_not_block_capture() {
    let fx = Fixture::new(&["Bash"]);
    fx.append(&[user_line("u1", HELLO), assistant_line("a1", REPLY)]);
    // A concurrent writer is mid-append.
    let mut body = fs::read_to_string(&fx.transcript).unwrap();
    body.push_str(r#"{"type":"assistant","uuid":"a2","mess"#);
    fs::write(&fx.transcript, body).unwrap();

    let block = fx.capture("s1").unwrap();
    assert!(block.contains(HELLO));
    assert_eq!(fx.cursor("s1").as_deref(), Some("a1"));
}

#[test]
fn test_sessions_keep_independent_cursors() {
    let fx = Fixture::new(&["Bash"]);
    fx.append(&[user_line("u1", HELLO), assistant_line("a1", REPLY)]);

    assert!(fx.capture("s1").is_some());
    assert!(fx.capture("s2").is_some());
    assert_eq!(fx.cursor("s1").as_deref(), Some("a1"));
    assert_eq!(fx.cursor("s2").as_deref(), Some("a1"));
}

#[test]
fn test_fallback_timestamp_when_first_entry_has_none() {
    let fx = Fixture::new(&["Bash"]);
    let no_ts = format!(
        r#"{{"type":"user","uuid":"u1","message":{{"role":"user","content":{}}}}}"#,
        serde_json::to_string(HELLO).unwrap()
    );
    fx.append(&[no_ts, assistant_line("a1", REPLY)]);

    let block = fx.capture("s1").unwrap();
    let first = block.split("\n\n").next().unwrap();
    let ts = first.strip_prefix("<|turn_start|>").unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
}

fn transcript_at(dir: &Path) -> PathBuf {
    dir.join("session.jsonl")
}

#[test]
fn test_cursor_write_failure_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let transcript = transcript_at(tmp.path());
    fs::write(
        &transcript,
        format!("{}\n{}\n", user_line("u1", HELLO), assistant_line("a1", REPLY)),
    )
    .unwrap();

    // A tracker directory path occupied by a regular file cannot be created.
    let blocker = tmp.path().join("trackers");
    fs::write(&blocker, "not a directory").unwrap();
    let ctx = CaptureContext {
        include_tools: ToolInclusionList::new(vec!["Bash".to_string()]),
        trackers: TrackerStore::at(&blocker),
    };

    assert!(format_new_entries(&ctx, &transcript, "s1").is_err());
}
