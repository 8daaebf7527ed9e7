use super::read_input;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use commonplace_editor::{
    bridge, DocumentTree, EditorMount, HistoryEditor, HostHooks, Mutation, Page, ShimConfig,
    Surface,
};
use serde::Deserialize;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// JSON array of steps to replay
    #[arg(short, long)]
    pub script: PathBuf,

    /// Text pushed by the host before the script runs
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// Print the document after every render
    #[arg(long)]
    pub show_renders: bool,
}

/// One step of a session script
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Edit(Mutation),
    Undo,
    Redo,
    Push(String),
}

/// What the host and the screen saw during a session
#[derive(Debug, Default)]
pub struct SessionLog {
    pub notifications: Vec<String>,
    pub renders: Vec<String>,
}

type SharedLog = Rc<RefCell<SessionLog>>;

struct LoggingHost {
    log: SharedLog,
}

impl HostHooks for LoggingHost {
    fn on_change(&self, text: &str) {
        self.log.borrow_mut().notifications.push(text.to_string());
    }
}

struct TerminalSurface {
    log: SharedLog,
}

impl Surface for TerminalSurface {
    fn render(&mut self, doc: &DocumentTree) {
        self.log.borrow_mut().renders.push(bridge::serialize(doc));
    }
}

/// Headless page with a single container
struct TerminalPage {
    container_id: String,
    log: SharedLog,
}

impl Page for TerminalPage {
    type Surface = TerminalSurface;

    fn container(&self, id: &str) -> Option<TerminalSurface> {
        (id == self.container_id).then(|| TerminalSurface {
            log: Rc::clone(&self.log),
        })
    }
}

pub fn session(args: SessionArgs, cwd: &str) -> Result<()> {
    let config = ShimConfig::load(cwd)?;
    let steps: Vec<Step> = serde_json::from_str(&read_input(Some(args.script.as_path()))?)
        .with_context(|| format!("Invalid script {}", args.script.display()))?;
    let initial = args.text.as_deref().map(|p| read_input(Some(p))).transpose()?;

    println!(
        "{} {} steps ({:?} mode)",
        "▶".bright_blue(),
        steps.len(),
        config.mode
    );

    let log = run_session(config, initial.as_deref(), &steps)?;
    let log = log.borrow();

    for (i, text) in log.notifications.iter().enumerate() {
        println!("  {} host #{}: {:?}", "→".green(), i + 1, text);
    }
    if args.show_renders {
        for (i, text) in log.renders.iter().enumerate() {
            println!("  {} render #{}: {:?}", "□".dimmed(), i + 1, text);
        }
    }

    println!();
    println!(
        "{} {} notifications, {} renders",
        "Done".green().bold(),
        log.notifications.len(),
        log.renders.len()
    );
    Ok(())
}

/// Mount a headless editor and replay the steps against it
pub(crate) fn run_session(
    config: ShimConfig,
    initial: Option<&str>,
    steps: &[Step],
) -> Result<SharedLog> {
    let log: SharedLog = Rc::new(RefCell::new(SessionLog::default()));
    let page = TerminalPage {
        container_id: config.container_id.clone(),
        log: Rc::clone(&log),
    };
    let host = Rc::new(LoggingHost {
        log: Rc::clone(&log),
    });

    let mut editor: EditorMount<HistoryEditor, TerminalSurface> =
        EditorMount::with_history(config, host);
    editor.mount(&page)?;

    if let Some(text) = initial {
        editor.push_text(text)?;
    }

    for (i, step) in steps.iter().enumerate() {
        tracing::debug!(step = i, ?step, "replaying");
        match step {
            Step::Edit(mutation) => editor
                .edit(mutation.clone())
                .with_context(|| format!("Step {} failed", i + 1))?,
            Step::Undo => {
                editor.undo()?;
            }
            Step::Redo => {
                editor.redo()?;
            }
            Step::Push(text) => editor.push_text(text)?,
        }
    }

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonplace_editor::BridgeMode;

    fn steps(json: &str) -> Vec<Step> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_script_format() {
        let parsed = steps(
            r#"[
                {"edit": {"op": "merge_block", "block": 1}},
                "undo",
                "redo",
                {"push": "fresh"}
            ]"#,
        );
        assert_eq!(
            parsed,
            vec![
                Step::Edit(Mutation::MergeBlock { block: 1 }),
                Step::Undo,
                Step::Redo,
                Step::Push("fresh".to_string()),
            ]
        );
    }

    #[test]
    fn test_session_reports_every_local_change() {
        let script = steps(
            r#"[
                {"edit": {"op": "insert_text", "block": 0, "leaf": 0, "offset": 5, "text": "!"}},
                {"edit": {"op": "split_block", "block": 0, "leaf": 0, "offset": 5}},
                "undo",
                {"push": "from host"}
            ]"#,
        );

        let log = run_session(ShimConfig::default(), Some("hello"), &script).unwrap();
        let log = log.borrow();

        assert_eq!(log.notifications, vec!["hello!", "hello\n!", "hello!"]);
        // mount, push, three local changes, push
        assert_eq!(log.renders.len(), 6);
        assert_eq!(log.renders.last().map(String::as_str), Some("from host"));
    }

    #[test]
    fn test_paragraph_session_is_silent() {
        let config = ShimConfig {
            mode: BridgeMode::Paragraph,
            ..ShimConfig::default()
        };
        let script = steps(r#"[{"edit": {"op": "insert_text", "block": 0, "leaf": 0, "offset": 0, "text": "x"}}]"#);

        let log = run_session(config, Some("a\nb"), &script).unwrap();

        assert!(log.borrow().notifications.is_empty());
        assert_eq!(log.borrow().renders.last().map(String::as_str), Some("xa\nb"));
    }

    #[test]
    fn test_failing_step_is_an_error() {
        let script = steps(r#"[{"edit": {"op": "merge_block", "block": 0}}]"#);
        let err = run_session(ShimConfig::default(), None, &script).unwrap_err();
        assert!(err.to_string().contains("Step 1"));
    }
}
