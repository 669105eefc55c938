//! Parsed Liquid-style templates.
//!
//! The supported subset covers what statement templates need:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `{{ Name }}` | output a binding |
//! | `{{ Items \| join: ", " }}` | output with filters (`join`, `upcase`, `downcase`, `strip`, `size`) |
//! | `{% if Name %}..{% else %}..{% endif %}` | conditional |
//! | `{% unless Name %}..{% endunless %}` | negated conditional |
//! | `{% for item in Items %}..{% endfor %}` | loop over a list |
//! | `{% comment %}..{% endcomment %}` | ignored block |
//! | `{{-` / `-}}` / `{%-` / `-%}` | trim whitespace on that side |
//!
//! `false`, `null`, empty strings and empty lists are falsy. Referencing a
//! binding that does not exist is a render error rather than empty output.

use dbsync_core::{Error, Result, TemplateError, TemplateErrorKind};
use regex::Regex;
use serde::Serialize;
use serde_json::Value as Json;
use std::sync::OnceLock;

const TAG_PATTERN: &str = r"(?s)\{\{(?P<out_l>-?)\s*(?P<out>.*?)\s*(?P<out_r>-?)\}\}|\{%(?P<tag_l>-?)\s*(?P<tag>.*?)\s*(?P<tag_r>-?)%\}";

fn tag_regex() -> Result<&'static Regex> {
    static TAG: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(TAG_PATTERN))
        .as_ref()
        .map_err(|e| {
            Error::Template(TemplateError {
                kind: TemplateErrorKind::Parse,
                template: None,
                message: format!("invalid tag pattern: {e}"),
            })
        })
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Output(String),
    Tag(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Filter {
    Join(String),
    Upcase,
    Downcase,
    Strip,
    Size,
}

#[derive(Debug, Clone, PartialEq)]
struct Expression {
    path: Vec<String>,
    filters: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Output(Expression),
    If {
        negate: bool,
        condition: Expression,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    For {
        var: String,
        source: Expression,
        body: Vec<Node>,
    },
}

/// A parsed template, ready to render against JSON bindings.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse `source` into a template named `name`.
    pub fn parse(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();
        let tokens = tokenize(&source).map_err(|e| with_template(e, &name))?;
        let mut parser = Parser {
            name: &name,
            tokens,
            pos: 0,
        };
        let (nodes, _) = parser.parse_nodes(&[])?;
        Ok(Self {
            name,
            source,
            nodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unparsed template body.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render against a JSON object of bindings.
    pub fn render(&self, bindings: &Json) -> Result<String> {
        let mut scope = Scope {
            template: &self.name,
            root: bindings,
            locals: Vec::new(),
        };
        let mut out = String::with_capacity(self.source.len());
        scope.render_nodes(&self.nodes, &mut out)?;
        Ok(out)
    }

    /// Serialize `bindings` to JSON and render against the result.
    pub fn render_with<B: Serialize>(&self, bindings: &B) -> Result<String> {
        let json = serde_json::to_value(bindings)
            .map_err(|e| render_error(&self.name, format!("bindings: {e}")))?;
        self.render(&json)
    }
}

fn parse_error(template: &str, message: impl Into<String>) -> Error {
    Error::Template(TemplateError {
        kind: TemplateErrorKind::Parse,
        template: Some(template.to_string()),
        message: message.into(),
    })
}

fn render_error(template: &str, message: impl Into<String>) -> Error {
    Error::Template(TemplateError {
        kind: TemplateErrorKind::Render,
        template: Some(template.to_string()),
        message: message.into(),
    })
}

fn with_template(err: Error, name: &str) -> Error {
    match err {
        Error::Template(mut te) => {
            te.template = Some(name.to_string());
            Error::Template(te)
        }
        other => other,
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let re = tag_regex()?;
    let mut tokens = Vec::new();
    let mut last = 0;
    let mut trim_next = false;

    for caps in re.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };

        let mut text = source[last..whole.start()].to_string();
        if trim_next {
            text = text.trim_start().to_string();
        }
        let trim_prev = caps.name("out_l").or(caps.name("tag_l")).is_some_and(|m| !m.is_empty());
        if trim_prev {
            text = text.trim_end().to_string();
        }
        if !text.is_empty() {
            tokens.push(Token::Text(text));
        }

        if let Some(out) = caps.name("out") {
            tokens.push(Token::Output(out.as_str().to_string()));
            trim_next = caps.name("out_r").is_some_and(|m| !m.is_empty());
        } else if let Some(tag) = caps.name("tag") {
            tokens.push(Token::Tag(tag.as_str().to_string()));
            trim_next = caps.name("tag_r").is_some_and(|m| !m.is_empty());
        }
        last = whole.end();
    }

    let mut rest = source[last..].to_string();
    if trim_next {
        rest = rest.trim_start().to_string();
    }
    if rest.contains("{{") || rest.contains("{%") {
        return Err(Error::Template(TemplateError {
            kind: TemplateErrorKind::Parse,
            template: None,
            message: "unclosed tag".to_string(),
        }));
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }
    Ok(tokens)
}

struct Parser<'n> {
    name: &'n str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    /// Parse nodes until one of `until` is reached, returning the terminator.
    fn parse_nodes(&mut self, until: &[&str]) -> Result<(Vec<Node>, Option<String>)> {
        let mut nodes = Vec::new();

        while self.pos < self.tokens.len() {
            let token = self.tokens[self.pos].clone();
            self.pos += 1;

            match token {
                Token::Text(text) => nodes.push(Node::Text(text)),
                Token::Output(expr) => nodes.push(Node::Output(self.parse_expression(&expr)?)),
                Token::Tag(tag) => {
                    let (keyword, rest) = match tag.split_once(char::is_whitespace) {
                        Some((k, r)) => (k, r.trim()),
                        None => (tag.as_str(), ""),
                    };

                    if until.contains(&keyword) {
                        return Ok((nodes, Some(keyword.to_string())));
                    }

                    match keyword {
                        "if" | "unless" => nodes.push(self.parse_conditional(keyword, rest)?),
                        "for" => nodes.push(self.parse_for(rest)?),
                        "comment" => {
                            self.parse_block("comment", &["endcomment"])?;
                        }
                        other => {
                            return Err(parse_error(self.name, format!("unexpected tag '{other}'")));
                        }
                    }
                }
            }
        }

        if until.is_empty() {
            Ok((nodes, None))
        } else {
            Err(parse_error(
                self.name,
                format!("unclosed block, expected one of: {}", until.join(", ")),
            ))
        }
    }

    fn parse_block(&mut self, opener: &str, until: &[&str]) -> Result<(Vec<Node>, String)> {
        match self.parse_nodes(until)? {
            (nodes, Some(end)) => Ok((nodes, end)),
            (_, None) => Err(parse_error(self.name, format!("unclosed '{opener}' block"))),
        }
    }

    fn parse_conditional(&mut self, keyword: &str, rest: &str) -> Result<Node> {
        if rest.is_empty() {
            return Err(parse_error(self.name, format!("'{keyword}' needs a condition")));
        }
        let condition = self.parse_expression(rest)?;
        let end = if keyword == "if" { "endif" } else { "endunless" };

        let (then, terminator) = self.parse_block(keyword, &["else", end])?;
        let otherwise = if terminator == "else" {
            self.parse_block(keyword, &[end])?.0
        } else {
            Vec::new()
        };

        Ok(Node::If {
            negate: keyword == "unless",
            condition,
            then,
            otherwise,
        })
    }

    fn parse_for(&mut self, rest: &str) -> Result<Node> {
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let [var, "in", source] = parts.as_slice() else {
            return Err(parse_error(
                self.name,
                format!("malformed for tag '{rest}', expected 'item in list'"),
            ));
        };
        if !is_identifier(var) {
            return Err(parse_error(self.name, format!("invalid loop variable '{var}'")));
        }
        let var = (*var).to_string();
        let source = self.parse_expression(source)?;
        let (body, _) = self.parse_block("for", &["endfor"])?;
        Ok(Node::For { var, source, body })
    }

    fn parse_expression(&self, text: &str) -> Result<Expression> {
        let mut segments = split_unquoted(text, '|').into_iter();
        let path_text = segments.next().unwrap_or_default();

        let path: Vec<String> = path_text.split('.').map(|s| s.trim().to_string()).collect();
        if path.iter().any(|p| !is_identifier(p)) {
            return Err(parse_error(
                self.name,
                format!("invalid variable reference '{path_text}'"),
            ));
        }

        let mut filters = Vec::new();
        for segment in segments {
            let (name, arg) = match segment.split_once(':') {
                Some((n, a)) => (n.trim(), Some(unquote(a.trim()))),
                None => (segment.trim(), None),
            };
            let filter = match (name, arg) {
                ("join", Some(Some(sep))) => Filter::Join(sep),
                ("join", None) => Filter::Join(" ".to_string()),
                ("upcase", None) => Filter::Upcase,
                ("downcase", None) => Filter::Downcase,
                ("strip", None) => Filter::Strip,
                ("size", None) => Filter::Size,
                _ => {
                    return Err(parse_error(self.name, format!("unsupported filter '{segment}'")));
                }
            };
            filters.push(filter);
        }

        Ok(Expression { path, filters })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(c) if c.is_ascii_digit() => return s.chars().all(|c| c.is_ascii_digit()),
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split on `sep` outside of single or double quotes, trimming each piece.
fn split_unquoted(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current.push(c);
            }
            None if c == sep => parts.push(std::mem::take(&mut current).trim().to_string()),
            None => current.push(c),
        }
    }
    parts.push(current.trim().to_string());
    parts
}

fn unquote(text: &str) -> Option<String> {
    let first = text.chars().next()?;
    if (first == '"' || first == '\'') && text.len() >= 2 && text.ends_with(first) {
        Some(text[1..text.len() - 1].to_string())
    } else {
        None
    }
}

struct Scope<'a> {
    template: &'a str,
    root: &'a Json,
    locals: Vec<(String, Json)>,
}

impl Scope<'_> {
    fn render_nodes(&mut self, nodes: &[Node], out: &mut String) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output(expr) => {
                    let value = self.evaluate(expr)?;
                    out.push_str(&to_output(&value));
                }
                Node::If {
                    negate,
                    condition,
                    then,
                    otherwise,
                } => {
                    let truthy = is_truthy(&self.evaluate(condition)?) != *negate;
                    self.render_nodes(if truthy { then } else { otherwise }, out)?;
                }
                Node::For { var, source, body } => match self.evaluate(source)? {
                    Json::Array(items) => {
                        for item in items {
                            self.locals.push((var.clone(), item));
                            let result = self.render_nodes(body, out);
                            self.locals.pop();
                            result?;
                        }
                    }
                    Json::Null => {}
                    other => {
                        return Err(render_error(
                            self.template,
                            format!("cannot loop over {}", type_label(&other)),
                        ));
                    }
                },
            }
        }
        Ok(())
    }

    fn evaluate(&self, expr: &Expression) -> Result<Json> {
        let mut value = self.lookup(&expr.path)?;
        for filter in &expr.filters {
            value = apply_filter(filter, value);
        }
        Ok(value)
    }

    fn lookup(&self, path: &[String]) -> Result<Json> {
        let Some((head, tail)) = path.split_first() else {
            return Err(render_error(self.template, "empty variable reference"));
        };

        let mut current = self
            .locals
            .iter()
            .rev()
            .find(|(name, _)| name == head)
            .map(|(_, v)| v.clone())
            .or_else(|| self.root.get(head.as_str()).cloned())
            .ok_or_else(|| render_error(self.template, format!("undefined variable '{head}'")))?;

        for segment in tail {
            current = match (&current, segment.as_str()) {
                (Json::Array(_) | Json::String(_), "size") => apply_filter(&Filter::Size, current.clone()),
                (Json::Array(items), idx) if idx.parse::<usize>().is_ok() => idx
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i).cloned())
                    .unwrap_or(Json::Null),
                (Json::Object(map), key) => map.get(key).cloned().ok_or_else(|| {
                    render_error(
                        self.template,
                        format!("undefined variable '{}'", path.join(".")),
                    )
                })?,
                _ => {
                    return Err(render_error(
                        self.template,
                        format!("cannot read '{segment}' of {}", type_label(&current)),
                    ));
                }
            };
        }
        Ok(current)
    }
}

fn apply_filter(filter: &Filter, value: Json) -> Json {
    match filter {
        Filter::Join(sep) => match value {
            Json::Array(items) => Json::String(
                items
                    .iter()
                    .map(to_output)
                    .collect::<Vec<_>>()
                    .join(sep),
            ),
            other => Json::String(to_output(&other)),
        },
        Filter::Upcase => Json::String(to_output(&value).to_uppercase()),
        Filter::Downcase => Json::String(to_output(&value).to_lowercase()),
        Filter::Strip => Json::String(to_output(&value).trim().to_string()),
        Filter::Size => {
            let n = match &value {
                Json::Array(items) => items.len(),
                Json::String(s) => s.chars().count(),
                Json::Object(map) => map.len(),
                _ => 0,
            };
            Json::from(n)
        }
    }
}

fn to_output(value: &Json) -> String {
    match value {
        Json::Null => String::new(),
        Json::Bool(b) => b.to_string(),
        Json::Number(n) => n.to_string(),
        Json::String(s) => s.clone(),
        Json::Array(items) => items.iter().map(to_output).collect(),
        Json::Object(_) => value.to_string(),
    }
}

fn is_truthy(value: &Json) -> bool {
    match value {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::String(s) => !s.is_empty(),
        Json::Array(items) => !items.is_empty(),
        Json::Number(_) | Json::Object(_) => true,
    }
}

fn type_label(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "a list",
        Json::Object(_) => "an object",
    }
}
