//! Text substitution engine.
//!
//! Supports the subset of Go-style template actions that project
//! templates rely on:
//!
//! - `{{ .Name }}`, nested fields like `{{ .Author.Email }}`, `{{ . }}`
//!   for the current value and `{{ $.Name }}` for the root context
//! - `{{if .X}} .. {{else if .Y}} .. {{else}} .. {{end}}`
//! - `{{range .List}} .. {{else}} .. {{end}}`
//! - `{{with .X}} .. {{else}} .. {{end}}`
//! - `{{- ` / ` -}}` to trim surrounding whitespace
//! - `{{/* comments */}}`
//!
//! A key missing from the context renders as `<no value>`, as Go does for
//! map lookups. Anything else inside `{{ }}` is rejected at parse time.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::{GpcError, GpcResult};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Rendered in place of a missing or null value.
pub const NO_VALUE: &str = "<no value>";

static FIELD_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\$?(\.[A-Za-z_][A-Za-z0-9_]*)+|\$|\.)$").expect("field path regex is valid")
});

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Action { body: String, line: usize },
}

/// A field reference, relative to the current value or to the root.
#[derive(Debug, Clone, PartialEq)]
struct Expr {
    from_root: bool,
    path: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BlockKind {
    If,
    Range,
    With,
}

impl BlockKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "if" => Some(Self::If),
            "range" => Some(Self::Range),
            "with" => Some(Self::With),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Range => "range",
            Self::With => "with",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Field(Expr),
    Block {
        kind: BlockKind,
        expr: Expr,
        body: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// Where a node list stopped.
enum Stop {
    Eof,
    End(usize),
    Else(String, usize),
}

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse `source`; `name` is used in error messages.
    pub fn parse(name: impl Into<String>, source: &str) -> GpcResult<Self> {
        let name = name.into();
        let nodes = lex(source)
            .and_then(|tokens| Parser { tokens, pos: 0 }.parse_root())
            .map_err(|message| GpcError::TemplateParse {
                file: name.clone(),
                message,
            })?;

        Ok(Self { name, nodes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the template contains no actions at all.
    pub fn is_plain_text(&self) -> bool {
        self.nodes.iter().all(|n| matches!(n, Node::Text(_)))
    }

    /// Render against `context`.
    pub fn render(&self, context: &Value) -> GpcResult<String> {
        let mut out = String::new();
        exec(&self.nodes, context, context, &mut out).map_err(|message| {
            GpcError::TemplateRender {
                file: self.name.clone(),
                message,
            }
        })?;
        Ok(out)
    }
}

/// Parse and render in one step.
pub fn render_str(name: &str, source: &str, context: &Value) -> GpcResult<String> {
    Template::parse(name, source)?.render(context)
}

fn lex(source: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut trim_next = false;

    while let Some(start) = rest.find(OPEN) {
        let line = line_at(source, source.len() - rest.len() + start);
        let mut text = &rest[..start];
        if trim_next {
            text = text.trim_start();
        }

        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or_else(|| format!("unclosed action at line {}", line))?;
        let mut inner = &after_open[..end];

        if let Some(stripped) = inner.strip_prefix("- ") {
            text = text.trim_end();
            inner = stripped;
        }
        trim_next = false;
        if let Some(stripped) = inner.strip_suffix(" -") {
            trim_next = true;
            inner = stripped;
        }

        if !text.is_empty() {
            tokens.push(Token::Text(text.to_string()));
        }

        let action = inner.trim();
        if !(action.starts_with("/*") && action.ends_with("*/") && action.len() >= 4) {
            tokens.push(Token::Action {
                body: action.to_string(),
                line,
            });
        }

        rest = &after_open[end + CLOSE.len()..];
    }

    let tail = if trim_next { rest.trim_start() } else { rest };
    if !tail.is_empty() {
        tokens.push(Token::Text(tail.to_string()));
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn parse_root(mut self) -> Result<Vec<Node>, String> {
        let (nodes, stop) = self.parse_list()?;
        match stop {
            Stop::Eof => Ok(nodes),
            Stop::End(line) => Err(format!("unexpected {{{{end}}}} at line {}", line)),
            Stop::Else(_, line) => Err(format!("unexpected {{{{else}}}} at line {}", line)),
        }
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Stop), String> {
        let mut nodes = Vec::new();

        while let Some(token) = self.tokens.get(self.pos).cloned() {
            self.pos += 1;
            let (body, line) = match token {
                Token::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Token::Action { body, line } => (body, line),
            };

            let (keyword, arg) = split_keyword(&body);
            match keyword {
                "end" if arg.is_empty() => return Ok((nodes, Stop::End(line))),
                "else" => return Ok((nodes, Stop::Else(arg.to_string(), line))),
                _ => match BlockKind::from_keyword(keyword) {
                    Some(kind) => nodes.push(self.parse_block(kind, arg, line)?),
                    None => nodes.push(Node::Field(parse_expr(&body)?)),
                },
            }
        }

        Ok((nodes, Stop::Eof))
    }

    fn parse_block(&mut self, kind: BlockKind, arg: &str, line: usize) -> Result<Node, String> {
        let expr = parse_expr(arg)?;
        let (body, stop) = self.parse_list()?;

        let otherwise = match stop {
            Stop::End(_) => Vec::new(),
            Stop::Eof => {
                return Err(format!(
                    "unclosed {{{{{}}}}} at line {}",
                    kind.keyword(),
                    line
                ))
            }
            Stop::Else(rest, _) if rest.is_empty() => {
                let (otherwise, stop) = self.parse_list()?;
                match stop {
                    Stop::End(_) => otherwise,
                    Stop::Eof => {
                        return Err(format!(
                            "unclosed {{{{{}}}}} at line {}",
                            kind.keyword(),
                            line
                        ))
                    }
                    Stop::Else(_, line) => {
                        return Err(format!("unexpected {{{{else}}}} at line {}", line))
                    }
                }
            }
            Stop::Else(rest, else_line) => {
                // `else if` / `else with` chain; the nested block owns the shared `end`.
                let (keyword, nested_arg) = split_keyword(&rest);
                if kind == BlockKind::Range || keyword != kind.keyword() {
                    return Err(format!(
                        "unexpected {{{{else {}}}}} at line {}",
                        rest, else_line
                    ));
                }
                vec![self.parse_block(kind, nested_arg, else_line)?]
            }
        };

        Ok(Node::Block {
            kind,
            expr,
            body,
            otherwise,
        })
    }
}

fn split_keyword(body: &str) -> (&str, &str) {
    match body.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (body, ""),
    }
}

fn parse_expr(action: &str) -> Result<Expr, String> {
    if action.is_empty() {
        return Err("missing value for command".to_string());
    }
    if !FIELD_PATH.is_match(action) {
        return Err(format!("unsupported action '{}'", action));
    }

    let (from_root, rest) = match action.strip_prefix('$') {
        Some(rest) => (true, rest),
        None => (false, action),
    };
    let path = rest
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Expr { from_root, path })
}

/// Resolve `expr`; `None` means a key along the path is missing.
fn eval<'v>(expr: &Expr, dot: &'v Value, root: &'v Value) -> Result<Option<&'v Value>, String> {
    let mut current = if expr.from_root { root } else { dot };
    for key in &expr.path {
        current = match current {
            Value::Object(map) => match map.get(key) {
                Some(value) => value,
                None => return Ok(None),
            },
            Value::Null => return Ok(None),
            other => {
                return Err(format!(
                    "can't evaluate field {} in non-mapping value {}",
                    key, other
                ))
            }
        };
    }
    Ok(Some(current))
}

fn exec(nodes: &[Node], dot: &Value, root: &Value, out: &mut String) -> Result<(), String> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Field(expr) => out.push_str(&format_value(eval(expr, dot, root)?)),
            Node::Block {
                kind,
                expr,
                body,
                otherwise,
            } => {
                let value = eval(expr, dot, root)?;
                match kind {
                    BlockKind::If if is_truthy(value) => exec(body, dot, root, out)?,
                    BlockKind::With => match value.filter(|v| is_truthy(Some(*v))) {
                        Some(inner) => exec(body, inner, root, out)?,
                        None => exec(otherwise, dot, root, out)?,
                    },
                    BlockKind::Range => {
                        let items: Vec<&Value> = match value {
                            None | Some(Value::Null) => Vec::new(),
                            Some(Value::Array(items)) => items.iter().collect(),
                            Some(Value::Object(map)) => map.values().collect(),
                            Some(other) => {
                                return Err(format!("range can't iterate over {}", other))
                            }
                        };
                        if items.is_empty() {
                            exec(otherwise, dot, root, out)?;
                        }
                        for item in items {
                            exec(body, item, root, out)?;
                        }
                    }
                    BlockKind::If => exec(otherwise, dot, root, out)?,
                }
            }
        }
    }
    Ok(())
}

/// Go truthiness: false, zero, null, missing and empty values are false.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NO_VALUE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn line_at(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}
