use std::collections::BTreeMap;

use serde_json::Value;

use super::command_registry::{
    CommandSpec, ANALYZE_COMMAND, EXAMPLE_SET_COMMAND, ID_TEXT_COMMANDS, IMAGE_COMMAND,
    IMAGE_OPTIMIZED_COMMAND, NO_ARG_COMMANDS, RAW_ARG_COMMANDS,
};
use crate::models::AspectRatio;

/// One parsed line of session input.
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub action: String,
    pub raw: String,
    pub prompt: Option<String>,
    pub command_args: BTreeMap<String, Value>,
}

impl Intent {
    fn new(action: &str, raw: &str) -> Self {
        Self {
            action: action.to_string(),
            raw: raw.to_string(),
            prompt: None,
            command_args: BTreeMap::new(),
        }
    }

    fn with_arg(mut self, key: &str, value: Value) -> Self {
        self.command_args.insert(key.to_string(), value);
        self
    }

    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.command_args.get(key).and_then(Value::as_str)
    }
}

fn find_spec(command: &str, specs: &[CommandSpec]) -> Option<CommandSpec> {
    specs.iter().find(|spec| spec.command == command).copied()
}

fn split_words(arg: &str) -> Vec<String> {
    if arg.trim().is_empty() {
        return Vec::new();
    }
    match shell_words::split(arg) {
        Ok(parts) => parts,
        Err(_) => arg.split_whitespace().map(str::to_string).collect(),
    }
}

fn split_head(arg: &str) -> (&str, &str) {
    match arg.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (arg, ""),
    }
}

/// Leading aspect-ratio token, if the first word is one.
fn split_aspect_ratio(arg: &str) -> (Value, &str) {
    let (head, tail) = split_head(arg);
    match head.parse::<AspectRatio>() {
        Ok(ratio) if !head.is_empty() => (Value::String(ratio.as_str().to_string()), tail),
        _ => (Value::Null, arg),
    }
}

pub fn parse_intent(text: &str) -> Intent {
    let raw_trimmed = text.trim();
    if raw_trimmed.is_empty() {
        return Intent::new("noop", text);
    }

    if let Some(slash_tail) = raw_trimmed.strip_prefix('/') {
        let command_len = slash_tail
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .count();
        if command_len > 0 {
            let command = slash_tail[..command_len].to_ascii_lowercase();
            let remainder = &slash_tail[command_len..];
            let arg = remainder.trim();

            if let Some(spec) = find_spec(&command, RAW_ARG_COMMANDS) {
                return Intent::new(spec.action, text)
                    .with_arg(spec.arg, Value::String(arg.to_string()));
            }

            if let Some(spec) = find_spec(&command, ID_TEXT_COMMANDS) {
                let (id, rest) = split_head(arg);
                return Intent::new(spec.action, text)
                    .with_arg("id", Value::String(id.to_string()))
                    .with_arg(spec.arg, Value::String(rest.to_string()));
            }

            if let Some(spec) = find_spec(&command, NO_ARG_COMMANDS) {
                return Intent::new(spec.action, text);
            }

            if command == IMAGE_COMMAND.command {
                let (ratio, prompt) = split_aspect_ratio(arg);
                return Intent::new(IMAGE_COMMAND.action, text)
                    .with_arg("aspect_ratio", ratio)
                    .with_arg(IMAGE_COMMAND.arg, Value::String(prompt.to_string()));
            }

            if command == IMAGE_OPTIMIZED_COMMAND.command {
                let (ratio, _) = split_aspect_ratio(arg);
                return Intent::new(IMAGE_OPTIMIZED_COMMAND.action, text)
                    .with_arg(IMAGE_OPTIMIZED_COMMAND.arg, ratio);
            }

            if command == ANALYZE_COMMAND.command {
                let mut words = split_words(arg).into_iter();
                let path = words.next().unwrap_or_default();
                let question = words.collect::<Vec<String>>().join(" ");
                return Intent::new(ANALYZE_COMMAND.action, text)
                    .with_arg("path", Value::String(path))
                    .with_arg(ANALYZE_COMMAND.arg, Value::String(question));
            }

            if command == EXAMPLE_SET_COMMAND.command {
                let mut words = split_words(arg).into_iter();
                let id = words.next().unwrap_or_default();
                let input = words.next().unwrap_or_default();
                let output = words.collect::<Vec<String>>().join(" ");
                return Intent::new(EXAMPLE_SET_COMMAND.action, text)
                    .with_arg("id", Value::String(id))
                    .with_arg("input", Value::String(input))
                    .with_arg("output", Value::String(output));
            }

            return Intent::new("unknown", text)
                .with_arg("command", Value::String(command))
                .with_arg("arg", Value::String(arg.to_string()));
        }
    }

    let mut intent = Intent::new("set_prompt", text);
    intent.prompt = Some(raw_trimmed.to_string());
    intent
}
