//! Integration tests for the editor mount and host hooks

use commonplace_editor::{
    bridge, BridgeMode, DocumentTree, EditorMount, HistoryEditor, HostHooks, Mutation, NoteBuffer,
    Page, RecordingHost, ShimConfig, Surface,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared log of everything that happened, in order
type Timeline = Rc<RefCell<Vec<String>>>;

struct TimelineSurface {
    timeline: Timeline,
}

impl Surface for TimelineSurface {
    fn render(&mut self, doc: &DocumentTree) {
        self.timeline
            .borrow_mut()
            .push(format!("render:{}", bridge::serialize(doc)));
    }
}

struct TimelinePage {
    timeline: Timeline,
}

impl Page for TimelinePage {
    type Surface = TimelineSurface;

    fn container(&self, id: &str) -> Option<TimelineSurface> {
        (id == "editor").then(|| TimelineSurface {
            timeline: Rc::clone(&self.timeline),
        })
    }
}

struct TimelineHost {
    timeline: Timeline,
}

impl HostHooks for TimelineHost {
    fn on_change(&self, text: &str) {
        self.timeline.borrow_mut().push(format!("host:{}", text));
    }
}

fn mounted(mode: BridgeMode) -> (EditorMount<HistoryEditor, TimelineSurface>, Timeline) {
    let timeline: Timeline = Rc::new(RefCell::new(Vec::new()));
    let host = Rc::new(TimelineHost {
        timeline: Rc::clone(&timeline),
    });
    let config = ShimConfig {
        mode,
        ..ShimConfig::default()
    };

    let mut editor = EditorMount::with_history(config, host);
    editor
        .mount(&TimelinePage {
            timeline: Rc::clone(&timeline),
        })
        .unwrap();
    timeline.borrow_mut().clear();

    (editor, timeline)
}

fn type_at_end(editor: &mut EditorMount<HistoryEditor, TimelineSurface>, text: &str) {
    let block = editor.document().block_count() - 1;
    let offset = editor.document().blocks[block].children[0].char_len();
    editor
        .edit(Mutation::InsertText {
            block,
            leaf: 0,
            offset,
            text: text.to_string(),
        })
        .unwrap();
}

#[test]
fn test_push_text_builds_one_block_per_line() {
    let (mut editor, timeline) = mounted(BridgeMode::Lines);

    editor.push_text("hello\nworld").unwrap();

    assert_eq!(editor.document(), &bridge::deserialize("hello\nworld"));
    assert_eq!(editor.text(), "hello\nworld");
    // Pushes render but are never echoed back to the host
    assert_eq!(*timeline.borrow(), vec!["render:hello\nworld"]);
}

#[test]
fn test_each_local_change_notifies_host_once_before_render() {
    let (mut editor, timeline) = mounted(BridgeMode::Lines);
    editor.push_text("ab").unwrap();
    timeline.borrow_mut().clear();

    type_at_end(&mut editor, "c");
    type_at_end(&mut editor, "d");

    assert_eq!(
        *timeline.borrow(),
        vec!["host:abc", "render:abc", "host:abcd", "render:abcd"]
    );
}

#[test]
fn test_push_overwrites_local_edits() {
    let (mut editor, _) = mounted(BridgeMode::Lines);
    editor.push_text("draft").unwrap();
    type_at_end(&mut editor, " with unsent edits");

    editor.push_text("from host").unwrap();

    assert_eq!(editor.document(), &bridge::deserialize("from host"));
    // The discarded edits cannot be undone back into the new note
    assert!(!editor.undo().unwrap());
    assert_eq!(editor.text(), "from host");
}

#[test]
fn test_rapid_pushes_each_replace_state() {
    let (mut editor, timeline) = mounted(BridgeMode::Lines);

    for text in ["one", "two", "three"] {
        editor.push_text(text).unwrap();
    }

    assert_eq!(editor.text(), "three");
    assert_eq!(
        *timeline.borrow(),
        vec!["render:one", "render:two", "render:three"]
    );
}

#[test]
fn test_paragraph_mode_never_notifies_host() {
    let (mut editor, timeline) = mounted(BridgeMode::Paragraph);

    editor.push_text("line one\nline two").unwrap();
    assert_eq!(editor.document(), &bridge::paragraph("line one\nline two"));
    assert_eq!(editor.document().block_count(), 1);

    type_at_end(&mut editor, "!");
    editor.local_change(bridge::deserialize("replaced")).unwrap();
    editor.undo().unwrap();

    assert!(timeline.borrow().iter().all(|entry| entry.starts_with("render:")));
    assert_eq!(timeline.borrow().len(), 4);
}

#[test]
fn test_local_change_with_whole_tree() {
    let host = Rc::new(RecordingHost::new());
    let timeline: Timeline = Rc::new(RefCell::new(Vec::new()));
    let mut editor: EditorMount<HistoryEditor, TimelineSurface> =
        EditorMount::with_history(ShimConfig::default(), host.clone());
    editor
        .mount(&TimelinePage {
            timeline: Rc::clone(&timeline),
        })
        .unwrap();

    let widget_value = r#"[
        {"type":"paragraph","children":[{"text":"Hello "},{"text":"there","bold":true}]},
        {"type":"paragraph","children":[{"text":"second"}]}
    ]"#;
    editor
        .local_change(DocumentTree::from_json(widget_value).unwrap())
        .unwrap();

    assert_eq!(host.received(), vec!["Hello there\nsecond"]);
    // Formatting stays in the editor; only the host copy is flattened
    assert_eq!(editor.document().blocks[0].children.len(), 2);
}

#[test]
fn test_undo_and_redo_are_reported() {
    let host = Rc::new(RecordingHost::new());
    let timeline: Timeline = Rc::new(RefCell::new(Vec::new()));
    let mut editor: EditorMount<HistoryEditor, TimelineSurface> =
        EditorMount::with_history(ShimConfig::default(), host.clone());
    editor.mount(&TimelinePage { timeline }).unwrap();
    editor.push_text("ab").unwrap();

    editor
        .edit(Mutation::SplitBlock {
            block: 0,
            leaf: 0,
            offset: 1,
        })
        .unwrap();
    assert!(editor.undo().unwrap());
    assert!(editor.redo().unwrap());

    assert_eq!(host.received(), vec!["a\nb", "ab", "a\nb"]);
}

#[test]
fn test_failed_edit_is_not_reported() {
    let host = Rc::new(RecordingHost::new());
    let timeline: Timeline = Rc::new(RefCell::new(Vec::new()));
    let mut editor: EditorMount<HistoryEditor, TimelineSurface> =
        EditorMount::with_history(ShimConfig::default(), host.clone());
    editor.mount(&TimelinePage { timeline }).unwrap();

    let result = editor.edit(Mutation::MergeBlock { block: 0 });

    assert!(result.is_err());
    assert_eq!(host.call_count(), 0);
}

#[test]
fn test_local_change_with_leafless_block_is_rejected() {
    let (mut editor, timeline) = mounted(BridgeMode::Lines);
    editor.push_text("kept").unwrap();
    timeline.borrow_mut().clear();

    let broken = DocumentTree::from_json(r#"[{"children":[{"text":"a"}]},{"children":[]}]"#).unwrap();
    let result = editor.local_change(broken);

    assert!(result.is_err());
    assert_eq!(editor.text(), "kept");
    assert!(editor.document().is_well_formed());
    assert!(timeline.borrow().is_empty());
}

#[test]
fn test_note_buffer_as_host() {
    let buffer = Rc::new(NoteBuffer::new());
    let timeline: Timeline = Rc::new(RefCell::new(Vec::new()));
    let mut editor: EditorMount<HistoryEditor, TimelineSurface> =
        EditorMount::with_history(ShimConfig::default(), buffer.clone());
    editor.mount(&TimelinePage { timeline }).unwrap();

    editor.push_text("saved note").unwrap();
    assert!(!buffer.is_dirty());

    editor
        .edit(Mutation::RemoveText {
            block: 0,
            leaf: 0,
            offset: 0,
            len: 6,
        })
        .unwrap();

    assert_eq!(buffer.take_for_save().as_deref(), Some("note"));
    assert!(!buffer.is_dirty());
}
