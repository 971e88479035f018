//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use agent_log_analytics::SourceConfig;
use serde_json::{Value, json};
use tempfile::TempDir;

pub const CODEX_SESSION_ID: &str = "0199a213-81c0-7800-8aa1-bbab2a035a53";

/// Builder for a fake home directory holding `.claude`, `.codex` and `.cursor` trees
pub struct FakeHome {
    temp_dir: TempDir,
}

impl FakeHome {
    /// Create a new builder with an empty home directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn claude_dir(&self) -> PathBuf {
        self.path().join(".claude")
    }

    pub fn codex_dir(&self) -> PathBuf {
        self.path().join(".codex")
    }

    pub fn cursor_dir(&self) -> PathBuf {
        self.path().join(".cursor")
    }

    /// Source roots under this home, ignoring the process environment
    pub fn config(&self) -> SourceConfig {
        SourceConfig::with_home(self.path())
    }

    /// Write a file relative to the home directory, creating parents
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().expect("file has a parent"))
            .expect("Failed to create parent dirs");
        fs::write(&path, content).expect("Failed to write file");
        self
    }

    /// Add a Claude Code session file under `projects/<encoded_project>/`
    pub fn with_claude_session(self, encoded_project: &str, file_name: &str, lines: &[Value]) -> Self {
        let relative = format!(".claude/projects/{}/{}", encoded_project, file_name);
        self.with_file(&relative, &to_jsonl(lines))
    }

    /// Add a subagent transcript under `projects/<encoded_project>/<session>/subagents/`
    pub fn with_claude_subagent(
        self,
        encoded_project: &str,
        session_id: &str,
        file_name: &str,
        lines: &[Value],
    ) -> Self {
        let relative =
            format!(".claude/projects/{}/{}/subagents/{}", encoded_project, session_id, file_name);
        self.with_file(&relative, &to_jsonl(lines))
    }

    /// Add a Codex session log under `sessions/<day>/` (day as `YYYY/MM/DD`)
    pub fn with_codex_session(self, day: &str, file_name: &str, lines: &[Value]) -> Self {
        let relative = format!(".codex/sessions/{}/{}", day, file_name);
        self.with_file(&relative, &to_jsonl(lines))
    }

    /// Add a Cursor transcript under `projects/<project>/agent-transcripts/`
    pub fn with_cursor_transcript(self, project: &str, file_name: &str, text: &str) -> Self {
        let relative = format!(".cursor/projects/{}/agent-transcripts/{}", project, file_name);
        self.with_file(&relative, text)
    }
}

impl Default for FakeHome {
    fn default() -> Self {
        Self::new()
    }
}

pub fn to_jsonl(lines: &[Value]) -> String {
    lines.iter().map(Value::to_string).collect::<Vec<_>>().join("\n")
}

/// A Claude Code user record with a plain-string prompt
pub fn claude_user(text: &str, timestamp: &str, cwd: &str) -> Value {
    json!({
        "type": "user",
        "message": {"role": "user", "content": text},
        "timestamp": timestamp,
        "sessionId": "s1",
        "cwd": cwd,
        "gitBranch": "main",
        "version": "1.0.30",
    })
}

/// A Claude Code assistant record with a text block followed by tool calls
pub fn claude_assistant(text: &str, tools: &[&str], timestamp: &str, cwd: &str) -> Value {
    let mut content = vec![json!({"type": "text", "text": text})];
    for (i, tool) in tools.iter().enumerate() {
        content.push(json!({"type": "tool_use", "id": format!("toolu_{}", i), "name": tool, "input": {}}));
    }
    json!({
        "type": "assistant",
        "message": {"role": "assistant", "content": content},
        "timestamp": timestamp,
        "sessionId": "s1",
        "cwd": cwd,
    })
}

pub fn codex_meta(id: &str, cwd: &str) -> Value {
    json!({
        "timestamp": "2025-03-02T09:00:00.000Z",
        "type": "session_meta",
        "payload": {"id": id, "cwd": cwd, "originator": "codex_cli_rs", "cli_version": "0.44.0"},
    })
}

pub fn codex_message(role: &str, text: &str, timestamp: &str) -> Value {
    let item_type = if role == "user" { "input_text" } else { "output_text" };
    json!({
        "timestamp": timestamp,
        "type": "response_item",
        "payload": {"type": "message", "role": role, "content": [{"type": item_type, "text": text}]},
    })
}

pub fn codex_function_call(name: &str, call_id: &str, timestamp: &str) -> Value {
    json!({
        "timestamp": timestamp,
        "type": "response_item",
        "payload": {"type": "function_call", "name": name, "arguments": "{}", "call_id": call_id},
    })
}

/// A home with one source of each kind:
///
/// - Claude Code `webapp` session using Grep, Read, Edit plus one Grep subagent run
/// - Codex `api` session calling `shell`
/// - Cursor `webapp` transcript calling `read_file`
pub fn realistic_home() -> FakeHome {
    let webapp = "/Users/dev/webapp";
    FakeHome::new()
        .with_claude_session(
            "-Users%2Fdev%2Fwebapp",
            "s1.jsonl",
            &[
                json!({"type": "summary", "summary": "Login fix", "leafUuid": "x"}),
                claude_user("Fix the login bug in the auth module", "2025-03-01T10:00:00Z", webapp),
                claude_assistant(
                    "Looking into it",
                    &["Grep", "Read", "Edit"],
                    "2025-03-01T10:00:05Z",
                    webapp,
                ),
                claude_user("thanks", "2025-03-01T10:02:00Z", webapp),
                claude_assistant("Glad to help", &[], "2025-03-01T10:02:03Z", webapp),
            ],
        )
        .with_claude_subagent(
            "-Users%2Fdev%2Fwebapp",
            "s1",
            "agent-a1.jsonl",
            &[
                claude_user("search for auth usage", "2025-03-01T10:00:10Z", webapp),
                claude_assistant("Found 3 matches", &["Grep"], "2025-03-01T10:00:20Z", webapp),
            ],
        )
        .with_codex_session(
            "2025/03/02",
            &format!("rollout-2025-03-02T09-00-00-{}.jsonl", CODEX_SESSION_ID),
            &[
                codex_meta(CODEX_SESSION_ID, "/Users/dev/api"),
                codex_message("user", "Add a pagination endpoint to the API", "2025-03-02T09:00:01Z"),
                codex_function_call("shell", "call_1", "2025-03-02T09:00:04Z"),
                codex_message("assistant", "Added the endpoint", "2025-03-02T09:00:30Z"),
            ],
        )
        .with_cursor_transcript(
            "webapp",
            "t1.txt",
            "user:\n<user_query>\nexplain the router\n</user_query>\n\nassistant:\nLet me look.\n[Tool call] read_file\n  path: src/router.ts\n[Tool result] read_file\n  export const router = ...\nThe router maps paths to handlers.\n",
        )
}
