//! Parser for the proto2 subset used by the schema definition files
//!
//! Supported: `syntax`, `package`, `import` and `option` statements (skipped
//! apart from `package`), top-level and nested `message` / `enum` blocks,
//! `required` / `optional` / `repeated` fields with `[...]` options, `oneof`
//! groups (members treated as optional) and `reserved` / `extensions`
//! statements. `map<>` fields, groups and services are rejected.

use super::schema::{FieldKind, FieldLabel, FieldSchema, MessageSchema, SchemaSet};
use crate::error::{CodecError, CodecResult};
use std::collections::{HashMap, HashSet};

impl SchemaSet {
    /// Parse one definition file and resolve every named field type
    pub fn parse(source_name: &str, text: &str) -> CodecResult<Self> {
        let tokens = tokenize(text).map_err(|e| CodecError::schema_load(source_name, e))?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            package: String::new(),
            messages: Vec::new(),
            enums: HashSet::new(),
        };
        parser
            .parse_file()
            .map_err(|e| CodecError::schema_load(source_name, e))?;
        parser
            .into_schema_set()
            .map_err(|e| CodecError::schema_load(source_name, e))
    }
}

/// Message as parsed, before field types are resolved
struct RawMessage {
    name: String,
    fields: Vec<RawField>,
}

struct RawField {
    name: String,
    tag: u32,
    label: FieldLabel,
    type_name: String,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    package: String,
    messages: Vec<RawMessage>,
    enums: HashSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    line: usize,
}

type ParseResult<T> = Result<T, String>;

impl Parser {
    fn parse_file(&mut self) -> ParseResult<()> {
        while let Some(token) = self.next() {
            match token.text.as_str() {
                "syntax" => {
                    self.expect("=")?;
                    let syntax = self.next_text()?;
                    if syntax.trim_matches('"') != "proto2" {
                        return Err(format!("line {}: unsupported syntax {syntax}", token.line));
                    }
                    self.expect(";")?;
                }
                "package" => {
                    self.package = self.next_text()?;
                    self.expect(";")?;
                }
                "import" | "option" => self.skip_statement()?,
                "message" => {
                    let scope = self.package.clone();
                    self.parse_message(&scope)?;
                }
                "enum" => {
                    let scope = self.package.clone();
                    self.parse_enum(&scope)?;
                }
                ";" => {}
                other => {
                    return Err(format!("line {}: unexpected '{other}' at top level", token.line));
                }
            }
        }
        Ok(())
    }

    fn parse_message(&mut self, scope: &str) -> ParseResult<()> {
        let name = qualify(scope, &self.next_text()?);
        self.expect("{")?;
        let mut fields = Vec::new();

        loop {
            let token = self.next().ok_or_else(|| format!("unterminated message {name}"))?;
            match token.text.as_str() {
                "}" => break,
                "message" => self.parse_message(&name)?,
                "enum" => self.parse_enum(&name)?,
                "option" | "reserved" | "extensions" => self.skip_statement()?,
                "oneof" => {
                    self.next_text()?;
                    self.expect("{")?;
                    while self.peek_text() != Some("}") {
                        let type_name = self.next_text()?;
                        fields.push(self.parse_field(FieldLabel::Optional, type_name)?);
                    }
                    self.expect("}")?;
                }
                "required" | "optional" | "repeated" => {
                    let label = match token.text.as_str() {
                        "required" => FieldLabel::Required,
                        "optional" => FieldLabel::Optional,
                        _ => FieldLabel::Repeated,
                    };
                    let type_name = self.next_text()?;
                    if type_name == "group" {
                        return Err(format!("line {}: groups are not supported", token.line));
                    }
                    fields.push(self.parse_field(label, type_name)?);
                }
                ";" => {}
                other => {
                    return Err(format!(
                        "line {}: unexpected '{other}' in message {name}",
                        token.line
                    ));
                }
            }
        }

        if let Some(dup) = duplicate_tag(&fields) {
            return Err(format!("message {name}: tag {dup} used twice"));
        }
        self.messages.push(RawMessage { name, fields });
        Ok(())
    }

    /// `<name> = <tag> [options] ;` after label and type
    fn parse_field(&mut self, label: FieldLabel, type_name: String) -> ParseResult<RawField> {
        if type_name.starts_with("map") {
            return Err("map fields are not supported".to_string());
        }
        let name = self.next_text()?;
        self.expect("=")?;
        let tag_text = self.next_text()?;
        let tag = tag_text
            .parse::<u32>()
            .ok()
            .filter(|t| (1..=536_870_911).contains(t))
            .ok_or_else(|| format!("field {name}: invalid tag '{tag_text}'"))?;

        if self.peek_text() == Some("[") {
            while self.next_text()? != "]" {}
        }
        self.expect(";")?;

        Ok(RawField {
            name,
            tag,
            label,
            type_name,
        })
    }

    fn parse_enum(&mut self, scope: &str) -> ParseResult<()> {
        let name = qualify(scope, &self.next_text()?);
        self.expect("{")?;
        let mut depth = 1;
        while depth > 0 {
            let token = self.next().ok_or_else(|| format!("unterminated enum {name}"))?;
            match token.text.as_str() {
                "{" => depth += 1,
                "}" => depth -= 1,
                _ => {}
            }
        }
        self.enums.insert(name);
        Ok(())
    }

    fn skip_statement(&mut self) -> ParseResult<()> {
        while self.next_text()? != ";" {}
        Ok(())
    }

    fn into_schema_set(self) -> ParseResult<SchemaSet> {
        let known: HashSet<&str> = self.messages.iter().map(|m| m.name.as_str()).collect();
        let mut messages = HashMap::with_capacity(self.messages.len());

        for raw in &self.messages {
            let mut fields = Vec::with_capacity(raw.fields.len());
            for field in &raw.fields {
                let kind = match FieldKind::scalar(&field.type_name) {
                    Some(kind) => kind,
                    None => match resolve(&raw.name, &field.type_name, &known, &self.enums) {
                        Some(Resolved::Message(fq)) => FieldKind::Message(fq),
                        Some(Resolved::Enum) => FieldKind::Varint,
                        None => {
                            return Err(format!(
                                "{}.{}: unknown type '{}'",
                                raw.name, field.name, field.type_name
                            ));
                        }
                    },
                };
                fields.push(FieldSchema {
                    name: field.name.clone(),
                    tag: field.tag,
                    label: field.label,
                    type_name: field.type_name.clone(),
                    kind,
                });
            }
            messages.insert(
                raw.name.clone(),
                MessageSchema {
                    name: raw.name.clone(),
                    fields,
                },
            );
        }

        Ok(SchemaSet {
            package: self.package,
            messages,
            enums: self.enums,
        })
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn next_text(&mut self) -> ParseResult<String> {
        self.next()
            .map(|t| t.text)
            .ok_or_else(|| "unexpected end of input".to_string())
    }

    fn peek_text(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(|t| t.text.as_str())
    }

    fn expect(&mut self, expected: &str) -> ParseResult<()> {
        match self.next() {
            Some(t) if t.text == expected => Ok(()),
            Some(t) => Err(format!("line {}: expected '{expected}', found '{}'", t.line, t.text)),
            None => Err(format!("expected '{expected}', found end of input")),
        }
    }
}

enum Resolved {
    Message(String),
    Enum,
}

/// Resolve a type reference using protobuf scoping: innermost scope first
fn resolve(
    scope: &str,
    type_name: &str,
    messages: &HashSet<&str>,
    enums: &HashSet<String>,
) -> Option<Resolved> {
    let lookup = |candidate: &str| {
        if messages.contains(candidate) {
            Some(Resolved::Message(candidate.to_string()))
        } else if enums.contains(candidate) {
            Some(Resolved::Enum)
        } else {
            None
        }
    };

    if let Some(absolute) = type_name.strip_prefix('.') {
        return lookup(absolute);
    }

    let mut current = scope;
    loop {
        if let Some(found) = lookup(&qualify(current, type_name)) {
            return Some(found);
        }
        match current.rfind('.') {
            Some(idx) => current = &current[..idx],
            None if !current.is_empty() => current = "",
            None => return None,
        }
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

fn duplicate_tag(fields: &[RawField]) -> Option<u32> {
    let mut seen = HashSet::new();
    fields.iter().map(|f| f.tag).find(|tag| !seen.insert(*tag))
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let start = line;
                let mut prev = '\0';
                loop {
                    match chars.next() {
                        Some('/') if prev == '*' => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            prev = c;
                        }
                        None => return Err(format!("line {start}: unterminated block comment")),
                    }
                }
            }
            '"' | '\'' => {
                let mut literal = String::from(c);
                loop {
                    match chars.next() {
                        Some('\\') => {
                            literal.push('\\');
                            if let Some(escaped) = chars.next() {
                                literal.push(escaped);
                            }
                        }
                        Some(end) if end == c => {
                            literal.push(end);
                            break;
                        }
                        Some('\n') | None => {
                            return Err(format!("line {line}: unterminated string literal"));
                        }
                        Some(other) => literal.push(other),
                    }
                }
                tokens.push(Token { text: literal, line });
            }
            '{' | '}' | '[' | ']' | '(' | ')' | '<' | '>' | '=' | ';' | ',' => tokens.push(Token {
                text: c.to_string(),
                line,
            }),
            c if c.is_alphanumeric() || c == '_' || c == '.' || c == '-' || c == '+' => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' || next == '.' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token { text: word, line });
            }
            other => return Err(format!("line {line}: unexpected character '{other}'")),
        }
    }

    Ok(tokens)
}
