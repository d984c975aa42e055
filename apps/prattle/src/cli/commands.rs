//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! All commands follow the same shape: load the dialogue file, apply one
//! edit (or run playback), save it back. The engine itself never touches
//! the filesystem.

use prattle_core::{
    Actor, BasicTriggerHandler, Dialogue, DialogueError, DialoguePlayer, NodeId, Response,
    Sentence, SentenceView, TriggerCommand, Variant, dialogue_from_bytes, dialogue_to_bytes,
    validate,
};
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for import (64 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_IMPORT_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &PathBuf, max_size: u64) -> Result<(), DialogueError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| DialogueError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(DialogueError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate file path for security.
///
/// This function:
/// 1. Canonicalizes the path to resolve symlinks and ".."
/// 2. Ensures the path exists
/// 3. Ensures the path is a file (not a directory)
fn validate_file_path(path: &std::path::Path) -> Result<PathBuf, DialogueError> {
    let canonical = path.canonicalize().map_err(|e| {
        DialogueError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(DialogueError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate output path for security.
///
/// For output files, we validate the parent directory exists and is writable.
fn validate_output_path(path: &std::path::Path) -> Result<PathBuf, DialogueError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => std::path::Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        DialogueError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(DialogueError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| DialogueError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create a new dialogue file seeded with a Start sentence.
pub fn cmd_init(file: &PathBuf, title: &str, force: bool) -> Result<(), DialogueError> {
    if file.exists() && !force {
        return Err(DialogueError::IoError(
            "Dialogue file already exists. Use --force to overwrite.".to_string(),
        ));
    }

    let dialogue = Dialogue::with_start(title);
    save_dialogue(&dialogue, file)?;

    println!("Initialized new dialogue '{}' at {:?}", title, file);
    println!("Node 0 is the Start sentence; edit it with `set 0 --text ...`");

    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show dialogue status.
pub fn cmd_status(file: &PathBuf, json_mode: bool) -> Result<(), DialogueError> {
    let dialogue = load_dialogue(file)?;
    let issues = validate(&dialogue);

    if json_mode {
        let output = serde_json::json!({
            "file": file.to_string_lossy(),
            "title": dialogue.title,
            "sentences": dialogue.sentence_count(),
            "deleted_slots": dialogue.deleted_count(),
            "responses": dialogue.response_count(),
            "starts": dialogue.variant_count(Variant::Start),
            "ends": dialogue.variant_count(Variant::End),
            "issues": issues.iter().map(|i| i.to_string()).collect::<Vec<_>>()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Prattle Dialogue Status");
    println!("=======================");
    println!("File:  {:?}", file);
    println!("Title: {}", dialogue.title);
    println!();
    println!("Sentences:     {}", dialogue.sentence_count());
    println!("Deleted slots: {}", dialogue.deleted_count());
    println!("Responses:     {}", dialogue.response_count());
    println!("Starts:        {}", dialogue.variant_count(Variant::Start));
    println!("Ends:          {}", dialogue.variant_count(Variant::End));
    println!("Issues:        {}", issues.len());

    Ok(())
}

// =============================================================================
// AUTHORING COMMANDS
// =============================================================================

/// Add a sentence node.
pub fn cmd_add(
    file: &PathBuf,
    json_mode: bool,
    text: &str,
    actor: Option<&str>,
) -> Result<(), DialogueError> {
    let mut dialogue = load_dialogue(file)?;

    let actor = actor.map(Actor::new);
    let id = dialogue.add_node(text, actor)?;
    save_dialogue(&dialogue, file)?;

    if json_mode {
        println!("{}", serde_json::json!({ "id": id.index() }));
    } else {
        println!("Added sentence as node {}", id);
    }

    Ok(())
}

/// Remove a sentence node.
pub fn cmd_remove(file: &PathBuf, id: usize) -> Result<(), DialogueError> {
    let mut dialogue = load_dialogue(file)?;

    let responses_before = dialogue.response_count();
    dialogue.remove_node(NodeId(id))?;
    let swept = responses_before.saturating_sub(dialogue.response_count());
    save_dialogue(&dialogue, file)?;

    println!("Removed node {} ({} responses swept)", id, swept);

    Ok(())
}

/// Edit an existing sentence.
#[allow(clippy::too_many_arguments)]
pub fn cmd_set(
    file: &PathBuf,
    id: usize,
    text: Option<&str>,
    variant: Option<&str>,
    actor: Option<&str>,
    expression: Option<usize>,
    add_trigger: Option<&str>,
    clear_triggers: bool,
) -> Result<(), DialogueError> {
    let mut dialogue = load_dialogue(file)?;
    let id = NodeId(id);

    if let Some(text) = text {
        dialogue.set_text(id, text)?;
    }
    if let Some(variant) = variant {
        dialogue.set_variant(id, parse_variant(variant)?)?;
    }
    if actor.is_some() || expression.is_some() {
        let actor = actor.map(Actor::new);
        dialogue.set_actor(id, actor, expression.unwrap_or(0))?;
    }
    if clear_triggers {
        dialogue.clear_triggers(id)?;
    }
    if let Some(trigger) = add_trigger {
        dialogue.add_trigger(id, trigger)?;
    }

    save_dialogue(&dialogue, file)?;
    println!("Updated node {}", id);

    Ok(())
}

/// Add a response edge between two nodes.
pub fn cmd_link(
    file: &PathBuf,
    from: usize,
    to: usize,
    text: Option<&str>,
    trigger: Option<&str>,
    condition: Option<&str>,
) -> Result<(), DialogueError> {
    let mut dialogue = load_dialogue(file)?;

    let mut response = match text {
        Some(text) => Response::new(text, NodeId(to)),
        None => Response::auto(NodeId(to)),
    };
    if let Some(trigger) = trigger {
        response = response.with_trigger(trigger);
    }
    if let Some(condition) = condition {
        response = response.with_condition(condition);
    }

    dialogue.add_response(NodeId(from), response)?;
    save_dialogue(&dialogue, file)?;

    match text {
        Some(text) => println!("Linked {} -> {} (\"{}\")", from, to, text),
        None => println!("Linked {} -> {} (auto-advance)", from, to),
    }

    Ok(())
}

/// Remove a response by display index.
pub fn cmd_unlink(file: &PathBuf, from: usize, index: usize) -> Result<(), DialogueError> {
    let mut dialogue = load_dialogue(file)?;

    dialogue.remove_response(NodeId(from), index)?;
    save_dialogue(&dialogue, file)?;

    println!("Removed response {} from node {}", index, from);

    Ok(())
}

/// Parse a variant name from the command line.
fn parse_variant(name: &str) -> Result<Variant, DialogueError> {
    match name {
        "default" => Ok(Variant::Default),
        "start" => Ok(Variant::Start),
        "end" => Ok(Variant::End),
        _ => Err(DialogueError::InvalidEdit(format!(
            "Unknown variant '{}'. Use: default, start, end",
            name
        ))),
    }
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Run structural checks and report every finding.
pub fn cmd_validate(file: &PathBuf, json_mode: bool) -> Result<(), DialogueError> {
    let dialogue = load_dialogue(file)?;
    let issues = validate(&dialogue);

    if json_mode {
        let output = serde_json::json!({
            "file": file.to_string_lossy(),
            "clean": issues.is_empty(),
            "issues": issues.iter().map(|i| i.to_string()).collect::<Vec<_>>()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if issues.is_empty() {
        println!("Dialogue is structurally clean");
    } else {
        println!("Found {} issue(s):", issues.len());
        for issue in &issues {
            println!("  - {}", issue);
        }
    }

    Ok(())
}

// =============================================================================
// PLAY COMMAND
// =============================================================================

/// Terminal presentation for interactive playback.
#[derive(Debug, Default)]
struct ConsoleView;

impl SentenceView for ConsoleView {
    fn sentence_entered(&mut self, sentence: &Sentence) {
        println!();
        match &sentence.actor {
            Some(actor) => println!("{}: {}", actor.title, sentence.text),
            None => println!("{}", sentence.text),
        }
        if sentence.has_choice() {
            for (i, response) in sentence.responses.iter().enumerate() {
                println!("  [{}] {}", i, response.text);
            }
        }
    }

    fn session_ended(&mut self) {
        println!();
        println!("(dialogue ended)");
    }
}

/// Play the dialogue interactively in the terminal.
pub fn cmd_play(file: &PathBuf) -> Result<(), DialogueError> {
    let dialogue = Arc::new(load_dialogue(file)?);
    let mut player = DialoguePlayer::new(ConsoleView, BasicTriggerHandler::new());

    player.start(dialogue)?;

    while player.is_active() {
        let wants_choice = player.current().map(Sentence::has_choice).unwrap_or(false);

        if wants_choice {
            let index = read_choice()?;
            match player.choose(index) {
                Ok(()) => {}
                Err(DialogueError::InvalidChoice) => {
                    println!("No such choice, try again.");
                }
                Err(e) => return Err(e),
            }
        } else {
            player.advance()?;
        }
    }

    report_triggers(player.triggers_mut().drain());

    Ok(())
}

/// Prompt for and parse a choice index from stdin.
fn read_choice() -> Result<usize, DialogueError> {
    loop {
        print!("> ");
        std::io::stdout()
            .flush()
            .map_err(|e| DialogueError::IoError(format!("Flush stdout: {}", e)))?;

        let mut line = String::new();
        let read = std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| DialogueError::IoError(format!("Read stdin: {}", e)))?;
        if read == 0 {
            // EOF; treat as choosing nothing valid so the session aborts.
            return Err(DialogueError::IoError("stdin closed".to_string()));
        }

        match line.trim().parse::<usize>() {
            Ok(index) => return Ok(index),
            Err(_) => println!("Enter a choice number."),
        }
    }
}

/// Summarize the commands the stock handler journaled during playback.
fn report_triggers(commands: Vec<TriggerCommand>) {
    if commands.is_empty() {
        return;
    }
    println!("Triggers dispatched:");
    for command in commands {
        match command {
            TriggerCommand::Music(track) => println!("  music: {}", track),
            TriggerCommand::Sound(clip) => println!("  sound: {}", clip),
        }
    }
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export dialogue to a file in binary or JSON format.
pub fn cmd_export(
    file: &PathBuf,
    output: &std::path::Path,
    format: &str,
) -> Result<(), DialogueError> {
    let validated_output = validate_output_path(output)?;

    let dialogue = load_dialogue(file)?;

    let data = match format {
        "binary" => dialogue_to_bytes(&dialogue)?,
        "json" => serde_json::to_vec_pretty(&dialogue)
            .map_err(|e| DialogueError::SerializationError(e.to_string()))?,
        _ => {
            return Err(DialogueError::SerializationError(format!(
                "Unknown format: {}. Use: binary, json",
                format
            )));
        }
    };

    std::fs::write(&validated_output, &data)
        .map_err(|e| DialogueError::IoError(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", data.len(), validated_output);

    Ok(())
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Import a dialogue file, replacing the working file.
pub fn cmd_import(file: &PathBuf, input: &std::path::Path) -> Result<(), DialogueError> {
    let validated_path = validate_file_path(input)?;
    validate_file_size(&validated_path, MAX_IMPORT_FILE_SIZE)?;

    let data = std::fs::read(&validated_path)
        .map_err(|e| DialogueError::IoError(format!("Read file: {}", e)))?;

    let dialogue = parse_dialogue_bytes(&data)?;
    save_dialogue(&dialogue, file)?;

    println!(
        "Imported '{}': {} sentences, {} responses",
        dialogue.title,
        dialogue.sentence_count(),
        dialogue.response_count()
    );

    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Parse dialogue bytes, trying the binary format first, then JSON.
fn parse_dialogue_bytes(data: &[u8]) -> Result<Dialogue, DialogueError> {
    if let Ok(dialogue) = dialogue_from_bytes(data) {
        return Ok(dialogue);
    }

    if let Ok(dialogue) = serde_json::from_slice::<Dialogue>(data) {
        return Ok(dialogue);
    }

    Err(DialogueError::SerializationError(
        "Could not parse dialogue file".to_string(),
    ))
}

/// Load a dialogue from the working file.
pub fn load_dialogue(file: &PathBuf) -> Result<Dialogue, DialogueError> {
    if !file.exists() {
        return Err(DialogueError::IoError(format!(
            "Dialogue file {:?} does not exist. Run `prattle init` first.",
            file
        )));
    }

    validate_file_size(file, MAX_IMPORT_FILE_SIZE)?;

    let data = std::fs::read(file)
        .map_err(|e| DialogueError::IoError(format!("Read dialogue: {}", e)))?;

    parse_dialogue_bytes(&data)
}

/// Save a dialogue to the working file in the binary format.
pub fn save_dialogue(dialogue: &Dialogue, file: &PathBuf) -> Result<(), DialogueError> {
    let data = dialogue_to_bytes(dialogue)?;
    std::fs::write(file, &data)
        .map_err(|e| DialogueError::IoError(format!("Write dialogue: {}", e)))?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
