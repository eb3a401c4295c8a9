//! Line-oriented ArchieML state machine.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::path::{self, Seg, ValuePath};

/// `:end`, `:skip`, `:endskip` and `:ignore`, case-insensitive.
static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*:[ \t\r]*(endskip|ignore|skip|end)").expect("invalid command regex")
});

/// `key: value`. Keys exclude whitespace and `[ ] { } : \`.
static KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^\s\[\]\{\}:\\]+)[ \t\r]*:[ \t\r]*(.*)").expect("invalid key regex")
});

/// `* value` inside a simple array.
static ARRAY_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*[ \t\r]*(.*)").expect("invalid array element regex"));

/// `{scope}`, `[array]`, `{.nested}`, `[+freeform]`, `{}` and `[]`.
static SCOPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\[\{])[ \t\r]*([+.]*)[ \t\r]*([^\s\[\]\{\}:\\]*)[ \t\r]*[\]\}]")
        .expect("invalid scope regex")
});

/// Backslash escaping the start of a line inside a multi-line value.
static LINE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\s*)\\").expect("invalid escape regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayKind {
    /// No element seen yet.
    Pending,
    /// `* item` strings.
    Simple,
    /// Objects, a new one started by each repeat of the first key.
    Complex,
    /// `{type, value}` objects in document order.
    Freeform,
}

#[derive(Debug)]
enum Frame {
    Object {
        parent_scope: ValuePath,
    },
    Array {
        path: ValuePath,
        kind: ArrayKind,
        first_key: Option<String>,
        parent_scope: ValuePath,
    },
}

impl Frame {
    fn parent_scope(self) -> ValuePath {
        match self {
            Self::Object { parent_scope } | Self::Array { parent_scope, .. } => parent_scope,
        }
    }
}

/// A value that may still grow into a multi-line value on `:end`.
#[derive(Debug)]
struct Buffer {
    target: ValuePath,
    text: String,
}

pub(crate) struct Parser {
    data: Value,
    stack: Vec<Frame>,
    /// Object receiving `key: value` lines.
    scope: ValuePath,
    buffer: Option<Buffer>,
    skipping: bool,
}

impl Parser {
    pub(crate) fn new() -> Self {
        Self {
            data: Value::Object(Map::new()),
            stack: Vec::new(),
            scope: ValuePath::new(),
            buffer: None,
            skipping: false,
        }
    }

    pub(crate) fn parse(mut self, input: &str) -> Value {
        for line in input.split_inclusive('\n') {
            if let Some(caps) = COMMAND.captures(line) {
                if !self.command(&caps[1].to_ascii_lowercase()) {
                    break;
                }
                continue;
            }
            if self.skipping {
                continue;
            }

            if !self.in_simple_array()
                && let Some(caps) = KEY.captures(line)
                && let Some(rest) = caps.get(2)
            {
                self.start_key(&caps[1], &line[rest.start()..]);
            } else if self.accepts_array_element()
                && let Some(caps) = ARRAY_ELEMENT.captures(line)
                && let Some(rest) = caps.get(1)
            {
                self.array_element(&line[rest.start()..]);
            } else if let Some(caps) = SCOPE.captures(line) {
                self.open_scope(&caps[1], &caps[2], &caps[3]);
            } else {
                self.text(line);
            }
        }
        self.buffer = None;
        self.data
    }

    fn top_array_kind(&self) -> Option<ArrayKind> {
        match self.stack.last() {
            Some(Frame::Array { kind, .. }) => Some(*kind),
            _ => None,
        }
    }

    fn in_simple_array(&self) -> bool {
        self.top_array_kind() == Some(ArrayKind::Simple)
    }

    fn in_freeform_array(&self) -> bool {
        self.top_array_kind() == Some(ArrayKind::Freeform)
    }

    fn accepts_array_element(&self) -> bool {
        matches!(
            self.top_array_kind(),
            Some(ArrayKind::Pending | ArrayKind::Simple)
        )
    }

    /// Returns `false` when parsing must stop.
    fn command(&mut self, command: &str) -> bool {
        if self.skipping && command != "endskip" && command != "ignore" {
            self.buffer = None;
            return true;
        }
        match command {
            "end" => {
                if let Some(buffer) = self.buffer.take() {
                    self.commit_multiline(buffer);
                }
                return true;
            }
            "ignore" => return false,
            "skip" => self.skipping = true,
            "endskip" => self.skipping = false,
            _ => {}
        }
        self.buffer = None;
        true
    }

    fn start_key(&mut self, key: &str, rest: &str) {
        self.buffer = None;
        self.increment_array_element(key);

        let key = if self.in_freeform_array() { "value" } else { key };
        let target = path::join_key(&self.scope, key);
        self.write_first_line(target, rest);
    }

    fn array_element(&mut self, rest: &str) {
        self.buffer = None;
        let Some(Frame::Array { path, kind, .. }) = self.stack.last_mut() else {
            return;
        };
        *kind = ArrayKind::Simple;
        let path = path.clone();

        let Some(array) = path::array_mut(&mut self.data, &path) else {
            return;
        };
        array.push(Value::String(String::new()));
        let mut target = path;
        target.push(Seg::Index(array.len() - 1));
        self.write_first_line(target, rest);
    }

    /// Store the single-line value and keep its trailing whitespace buffered
    /// so a later `:end` can extend it.
    fn write_first_line(&mut self, target: ValuePath, rest: &str) {
        let value = rest.trim_start();
        let trimmed = value.trim_end();
        if let Some(slot) = path::slot(&mut self.data, &target) {
            *slot = Value::String(trimmed.to_owned());
        }
        self.buffer = Some(Buffer {
            target,
            text: value[trimmed.len()..].to_owned(),
        });
    }

    fn commit_multiline(&mut self, buffer: Buffer) {
        let appended = LINE_ESCAPE.replace_all(&buffer.text, "$1");
        let appended = appended.trim_end();
        if let Some(slot) = path::slot(&mut self.data, &buffer.target) {
            let mut value = match slot {
                Value::String(existing) => std::mem::take(existing),
                _ => String::new(),
            };
            value.push_str(appended);
            *slot = Value::String(value);
        }
    }

    fn text(&mut self, line: &str) {
        if self.in_freeform_array() && !line.trim().is_empty() {
            if let Some(Frame::Array { path, .. }) = self.stack.last()
                && let Some(array) = path::array_mut(&mut self.data, path)
            {
                array.push(freeform_item("text", Value::String(line.trim().to_owned())));
            }
            return;
        }
        if let Some(buffer) = &mut self.buffer {
            buffer.text.push_str(line);
        }
    }

    /// Called for every key (or nested scope key) seen inside an array.
    fn increment_array_element(&mut self, key: &str) {
        let Some(Frame::Array {
            path,
            kind,
            first_key,
            ..
        }) = self.stack.last_mut()
        else {
            return;
        };

        match kind {
            ArrayKind::Simple => return,
            ArrayKind::Pending => *kind = ArrayKind::Complex,
            ArrayKind::Complex | ArrayKind::Freeform => {}
        }

        let freeform = *kind == ArrayKind::Freeform;
        let starts_element = first_key.as_deref().is_none_or(|first| first == key);
        if !freeform && first_key.is_none() {
            *first_key = Some(key.to_owned());
        }
        let path = path.clone();

        if starts_element && let Some(array) = path::array_mut(&mut self.data, &path) {
            let element = if freeform {
                freeform_item(key, Value::Null)
            } else {
                Value::Object(Map::new())
            };
            array.push(element);
            let mut scope = path;
            scope.push(Seg::Index(array.len() - 1));
            self.scope = scope;
        }
    }

    fn open_scope(&mut self, bracket: &str, flags: &str, key: &str) {
        self.buffer = None;

        if key.is_empty() {
            self.scope = self
                .stack
                .pop()
                .map(Frame::parent_scope)
                .unwrap_or_default();
            return;
        }

        let nesting = flags.starts_with('.');
        let nested_in_freeform = nesting && self.in_freeform_array();
        if nesting {
            self.increment_array_element(key);
        } else {
            self.scope.clear();
            self.stack.clear();
        }

        let parent_scope = self.scope.clone();
        let target = if bracket == "[" && nested_in_freeform {
            // Becomes {"type": key, "value": [...]} in the enclosing array.
            path::join_key(&self.scope, "value")
        } else {
            path::join_key(&self.scope, key)
        };

        let Some(slot) = path::slot(&mut self.data, &target) else {
            return;
        };

        let frame = if bracket == "[" {
            *slot = Value::Array(Vec::new());
            let kind = if flags.contains('+') {
                ArrayKind::Freeform
            } else {
                ArrayKind::Pending
            };
            Frame::Array {
                path: target,
                kind,
                first_key: None,
                parent_scope,
            }
        } else {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            self.scope = target;
            Frame::Object { parent_scope }
        };

        self.stack.push(frame);
    }
}

fn freeform_item(kind: &str, value: Value) -> Value {
    let mut item = Map::new();
    item.insert("type".to_owned(), Value::String(kind.to_owned()));
    item.insert("value".to_owned(), value);
    Value::Object(item)
}
