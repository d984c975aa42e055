//! # Playback Scenario Tests
//!
//! End-to-end walks through authored dialogues, exercising the player,
//! the trigger handler, and the view together. Events from both
//! collaborators land in one shared log so relative ordering is checked,
//! not just counts.

use prattle_core::{
    BasicTriggerHandler, Dialogue, DialogueError, DialoguePlayer, NodeId, Response, Sentence,
    SentenceView, SessionState, TriggerCommand, TriggerHandler, Variant,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

type EventLog = Rc<RefCell<Vec<String>>>;

struct LoggingView {
    log: EventLog,
}

impl SentenceView for LoggingView {
    fn sentence_entered(&mut self, sentence: &Sentence) {
        self.log.borrow_mut().push(format!("enter:{}", sentence.text));
    }

    fn session_ended(&mut self) {
        self.log.borrow_mut().push("ended".to_string());
    }
}

struct LoggingTriggers {
    log: EventLog,
    fail_on: Option<String>,
}

impl TriggerHandler for LoggingTriggers {
    fn handle(&mut self, trigger: &str) -> Result<(), DialogueError> {
        if self.fail_on.as_deref() == Some(trigger) {
            return Err(DialogueError::TriggerFailed {
                trigger: trigger.to_string(),
                reason: "refused by host".to_string(),
            });
        }
        self.log.borrow_mut().push(format!("trigger:{}", trigger));
        Ok(())
    }
}

fn logging_player(fail_on: Option<&str>) -> (DialoguePlayer<LoggingView, LoggingTriggers>, EventLog)
{
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let player = DialoguePlayer::new(
        LoggingView {
            log: Rc::clone(&log),
        },
        LoggingTriggers {
            log: Rc::clone(&log),
            fail_on: fail_on.map(str::to_string),
        },
    );
    (player, log)
}

/// Start --auto--> "How can I help?" --choices--> {"Thanks" -> End,
/// "Tell me more" -> "It's a long story." -> terminal}
fn shop_dialogue() -> Arc<Dialogue> {
    let mut dialogue = Dialogue::with_start("shop");
    dialogue
        .set_text(NodeId(0), "Welcome in.")
        .expect("set text");
    dialogue
        .add_trigger(NodeId(0), "music a")
        .expect("add trigger");
    dialogue
        .add_trigger(NodeId(0), "sound b")
        .expect("add trigger");

    let help = dialogue.add_node("How can I help?", None).expect("add");
    let story = dialogue
        .add_node("It's a long story.", None)
        .expect("add");
    let end = dialogue.add_node("", None).expect("add");
    dialogue.set_variant(end, Variant::End).expect("set variant");

    dialogue
        .add_response(NodeId(0), Response::auto(help))
        .expect("link");
    dialogue
        .add_response(help, Response::new("Thanks", end).with_trigger("sound bell"))
        .expect("link");
    dialogue
        .add_response(help, Response::new("Tell me more", story))
        .expect("link");
    Arc::new(dialogue)
}

// =============================================================================
// SCENARIOS
// =============================================================================

/// Full happy path: start, auto-advance, choose into the End marker.
#[test]
fn full_session_through_choice_to_end() {
    let (mut player, log) = logging_player(None);
    player.start(shop_dialogue()).expect("start");
    player.advance().expect("advance");
    player.choose(0).expect("choose");

    assert_eq!(
        *log.borrow(),
        vec![
            "trigger:music a",
            "trigger:sound b",
            "enter:Welcome in.",
            "enter:How can I help?",
            "trigger:sound bell",
            "ended",
        ]
    );
    assert_eq!(player.state(), SessionState::Idle);
}

/// Sentence triggers fire in authored order, strictly before the view
/// sees the sentence.
#[test]
fn sentence_triggers_precede_presentation() {
    let (mut player, log) = logging_player(None);
    player.start(shop_dialogue()).expect("start");

    let events = log.borrow();
    let music = events.iter().position(|e| e == "trigger:music a");
    let sound = events.iter().position(|e| e == "trigger:sound b");
    let enter = events.iter().position(|e| e == "enter:Welcome in.");
    assert!(music < sound && sound < enter);
}

/// The second branch runs into a terminal sentence; advancing past it
/// tears the session down.
#[test]
fn terminal_branch_ends_on_advance() {
    let (mut player, log) = logging_player(None);
    player.start(shop_dialogue()).expect("start");
    player.advance().expect("advance");
    player.choose(1).expect("choose");

    assert_eq!(player.current().map(|s| s.text.as_str()), Some("It's a long story."));
    player.advance().expect("advance");

    assert_eq!(player.state(), SessionState::Idle);
    assert_eq!(log.borrow().last().map(String::as_str), Some("ended"));
}

/// A failing response trigger aborts before any transition: the next
/// sentence is never entered and teardown still runs exactly once.
#[test]
fn failing_response_trigger_aborts_cleanly() {
    let (mut player, log) = logging_player(Some("sound bell"));
    player.start(shop_dialogue()).expect("start");
    player.advance().expect("advance");

    let result = player.choose(0);
    assert!(matches!(result, Err(DialogueError::TriggerFailed { .. })));
    assert_eq!(player.state(), SessionState::Idle);

    let events = log.borrow();
    assert_eq!(events.iter().filter(|e| *e == "ended").count(), 1);
    assert!(!events.iter().any(|e| e.starts_with("trigger:sound bell")));
}

/// A failing sentence trigger aborts mid-entry: the view never sees the
/// sentence whose trigger failed.
#[test]
fn failing_sentence_trigger_aborts_before_view() {
    let (mut player, log) = logging_player(Some("sound b"));

    let result = player.start(shop_dialogue());
    assert!(matches!(result, Err(DialogueError::TriggerFailed { .. })));
    assert_eq!(player.state(), SessionState::Idle);

    assert_eq!(
        *log.borrow(),
        vec!["trigger:music a", "ended"]
    );
}

/// Playing the same dialogue twice produces the same event stream.
#[test]
fn replay_is_deterministic() {
    let dialogue = shop_dialogue();

    let mut streams = Vec::new();
    for _ in 0..2 {
        let (mut player, log) = logging_player(None);
        player.start(Arc::clone(&dialogue)).expect("start");
        player.advance().expect("advance");
        player.choose(1).expect("choose");
        player.advance().expect("advance");
        streams.push(log.borrow().clone());
    }

    assert_eq!(streams[0], streams[1]);
}

/// The stock handler journals recognized commands in dispatch order and
/// swallows everything else.
#[test]
fn basic_handler_journals_session_commands() {
    let mut player = DialoguePlayer::new(
        prattle_core::NullView,
        BasicTriggerHandler::new(),
    );
    player.start(shop_dialogue()).expect("start");
    player.advance().expect("advance");
    player.choose(0).expect("choose");

    assert_eq!(
        player.triggers().journal(),
        &[
            TriggerCommand::Music("a".to_string()),
            TriggerCommand::Sound("b".to_string()),
            TriggerCommand::Sound("bell".to_string()),
        ]
    );
}

/// Editing is possible again once the session releases its handle.
#[test]
fn dialogue_is_editable_between_sessions() {
    let dialogue = shop_dialogue();
    let (mut player, _log) = logging_player(None);
    player.start(Arc::clone(&dialogue)).expect("start");
    player.advance().expect("advance");
    player.choose(0).expect("choose");
    assert_eq!(player.state(), SessionState::Idle);
    drop(player);

    let mut dialogue = Arc::try_unwrap(dialogue).expect("sole owner");
    let extra = dialogue.add_node("New line", None).expect("add");
    assert_eq!(extra, NodeId(4));
}
