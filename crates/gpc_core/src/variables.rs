//! Variable resolution.
//!
//! Each declared variable takes its value from, in order: caller-supplied
//! inline data, an interactive prompt, the declared default.

use std::collections::{BTreeMap, VecDeque};
use std::io::{self, BufRead, Write};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::config::VariableDeclaration;
use crate::data::InlineData;
use crate::error::{GpcError, GpcResult};

/// How typed prompt input is turned into a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Input is always a string, whatever the default's type.
    #[default]
    Text,
    /// Input is parsed to the same kind as the declared default.
    MatchDefault,
}

/// Source of interactive answers.
pub trait Prompter {
    /// Show `message` and return one line of input without its line ending.
    fn ask(&self, message: &str) -> GpcResult<String>;
}

/// Prompts on stdout and reads answers from stdin.
#[derive(Debug, Default)]
pub struct StdioPrompter;

impl Prompter for StdioPrompter {
    fn ask(&self, message: &str) -> GpcResult<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", message)?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| GpcError::Prompt(e.to_string()))?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Replays canned answers; records every question asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, message: &str) -> GpcResult<String> {
        self.asked.lock().push(message.to_string());
        self.answers
            .lock()
            .pop_front()
            .ok_or_else(|| GpcError::Prompt("no more scripted answers".to_string()))
    }
}

/// Fully resolved variable values, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedVariables(BTreeMap<String, Value>);

impl ResolvedVariables {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The values as a JSON object, the substitution context for rendering.
    pub fn to_context(&self) -> Value {
        Value::Object(self.0.clone().into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for ResolvedVariables {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Resolves declared variables against inline data, prompts and defaults.
pub struct VariableResolver<'a> {
    data: &'a InlineData,
    prompter: Option<&'a dyn Prompter>,
    input_mode: InputMode,
}

impl<'a> VariableResolver<'a> {
    /// Resolver that never prompts.
    pub fn new(data: &'a InlineData) -> Self {
        Self {
            data,
            prompter: None,
            input_mode: InputMode::default(),
        }
    }

    /// Ask `prompter` for any variable the inline data does not cover.
    pub fn interactive(mut self, prompter: &'a dyn Prompter) -> Self {
        self.prompter = Some(prompter);
        self
    }

    pub fn input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    pub fn resolve(&self, declarations: &[VariableDeclaration]) -> GpcResult<ResolvedVariables> {
        let mut resolved = BTreeMap::new();

        for var in declarations {
            let value = self.resolve_one(var)?;
            resolved.insert(var.name.clone(), value);
        }

        Ok(ResolvedVariables(resolved))
    }

    fn resolve_one(&self, var: &VariableDeclaration) -> GpcResult<Value> {
        if let Some(value) = self.data.get(&var.name) {
            debug!("Variable {} supplied by inline data", var.name);
            return Ok(value.clone());
        }

        let Some(prompter) = self.prompter else {
            return Ok(var.default.clone());
        };

        let question = format!("{} ({}): ", var.description, display_default(&var.default));
        let input = prompter.ask(&question)?;
        if input.is_empty() {
            return Ok(var.default.clone());
        }

        match self.input_mode {
            InputMode::Text => Ok(Value::String(input)),
            InputMode::MatchDefault => coerce(&var.name, &input, &var.default),
        }
    }
}

fn display_default(default: &Value) -> String {
    match default {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse `input` into the same kind of value as `default`.
fn coerce(name: &str, input: &str, default: &Value) -> GpcResult<Value> {
    let invalid = |expected: &str| {
        GpcError::InvalidData(format!(
            "value '{}' for {} is not {}",
            input, name, expected
        ))
    };

    match default {
        Value::Bool(_) => match input.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" => Ok(Value::Bool(true)),
            "false" | "no" | "n" => Ok(Value::Bool(false)),
            _ => Err(invalid("a boolean")),
        },
        Value::Number(n) if n.is_f64() => input
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid("a number")),
        Value::Number(_) => input
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid("an integer")),
        Value::Array(_) | Value::Object(_) => {
            let parsed: Value =
                serde_json::from_str(input).map_err(|_| invalid("valid JSON"))?;
            if std::mem::discriminant(&parsed) == std::mem::discriminant(default) {
                Ok(parsed)
            } else {
                Err(invalid(if default.is_array() { "a list" } else { "a mapping" }))
            }
        }
        Value::String(_) | Value::Null => Ok(Value::String(input.to_string())),
    }
}
