use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use wifisend_core::Msg;

use super::app::AppEvent;

pub(crate) const HELP: &str = "\
Commands:
  address <addr>     edit the device address (not saved)
  test               check that the device answers
  save               save the current address
  configure <addr>   set and save the device address
  send <file>...     send EPUB files to the device; quote paths with spaces
  status             show address, activity and last result
  help               show this help
  quit               exit once the running task is done";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    Input(Msg),
    Send(Vec<PathBuf>),
    Status,
    Help,
    Quit,
    Invalid(String),
}

/// Parses one input line. Blank lines yield `None`.
pub(crate) fn parse_command(line: &str) -> Option<ShellCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "address" if rest.is_empty() => ShellCommand::Invalid("usage: address <addr>".into()),
        "address" => ShellCommand::Input(Msg::AddressChanged(rest.to_string())),
        "test" => ShellCommand::Input(Msg::TestConnectionClicked),
        "save" => ShellCommand::Input(Msg::SaveSettingsClicked),
        "configure" if rest.is_empty() => {
            ShellCommand::Invalid("usage: configure <addr>".into())
        }
        "configure" => ShellCommand::Input(Msg::AddressConfigured(rest.to_string())),
        "send" => match split_arguments(rest) {
            Ok(args) => ShellCommand::Send(args.into_iter().map(PathBuf::from).collect()),
            Err(reason) => ShellCommand::Invalid(reason),
        },
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Invalid(format!("unknown command {other:?}; try help")),
    };
    Some(command)
}

/// Splits on whitespace, keeping `"..."` and `'...'` groups together.
fn split_arguments(text: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for ch in text.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_arg = true;
            }
            None if ch.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(ch);
                in_arg = true;
            }
        }
    }
    if let Some(open) = quote {
        return Err(format!("unclosed {open} in: {text}"));
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

/// Reads stdin on its own thread so the control loop never blocks on input.
pub(crate) fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = parse_command(&line) {
                if tx.send(AppEvent::Shell(command)).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}
