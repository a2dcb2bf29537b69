// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Message records produced by the PO parser.

use std::fmt;

/// One piece of a translated message.
///
/// The order of parts reproduces the layout of the original translation
/// text: literal parts are emitted verbatim, placeholder parts stand in
/// for a value substituted at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessagePart {
    /// Literal text.
    Literal(String),
    /// A named reference to a runtime-substituted value.
    Placeholder(String),
}

impl fmt::Display for MessagePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagePart::Literal(text) => f.write_str(text),
            MessagePart::Placeholder(name) => write!(f, "{{{name}}}"),
        }
    }
}

/// A single localizable message parsed from a PO file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    id: String,
    meaning: Option<String>,
    description: Option<String>,
    parts: Vec<MessagePart>,
}

impl Message {
    /// The canonical message id, taken verbatim from the `#: id=`
    /// comment. Never empty.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The meaning used to disambiguate messages with the same key.
    pub fn meaning(&self) -> Option<&str> {
        self.meaning.as_deref()
    }

    /// The human-readable description, taken from `msgctxt`.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The translation as an ordered sequence of parts.
    ///
    /// Empty only when the source translation itself was empty.
    pub fn parts(&self) -> &[MessagePart] {
        &self.parts
    }

    /// Render the message as a single ICU-style string.
    ///
    /// Placeholder references render as `{name}`; plural messages come
    /// out as `{var ,plural, offset:0  =1 {...} other {...}}`.
    pub fn icu_text(&self) -> String {
        self.parts.iter().map(ToString::to_string).collect()
    }
}

/// Accumulates the fields of a [`Message`] while a block is parsed.
///
/// Consecutive literal fragments are merged into a single
/// [`MessagePart::Literal`]; appending a placeholder reference closes
/// the current literal run. [`build`](MessageBuilder::build) consumes
/// the builder, so a finished builder cannot be reused for another
/// message.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    key: Option<String>,
    meaning: Option<String>,
    description: Option<String>,
    parts: Vec<MessagePart>,
    literal: String,
}

impl MessageBuilder {
    pub fn new() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// Set the message key, which doubles as the id.
    pub fn set_key(&mut self, key: &str) {
        self.key = Some(String::from(key));
    }

    pub fn set_meaning(&mut self, meaning: &str) {
        self.meaning = Some(String::from(meaning));
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = Some(String::from(description));
    }

    /// Append literal text, merging with any literal text before it.
    pub fn append_string_part(&mut self, text: &str) {
        self.literal.push_str(text);
    }

    /// Append a placeholder reference, closing the current literal run.
    pub fn append_placeholder_reference(&mut self, name: &str) {
        self.flush_literal();
        self.parts.push(MessagePart::Placeholder(String::from(name)));
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            self.parts
                .push(MessagePart::Literal(std::mem::take(&mut self.literal)));
        }
    }

    /// Finalize the builder into an immutable [`Message`].
    ///
    /// Returns `None` when no non-empty key was captured. This is how
    /// the PO header block, which has no `#: id=` comment, drops out of
    /// the bundle.
    pub fn build(mut self) -> Option<Message> {
        self.flush_literal();
        let id = self.key.filter(|key| !key.is_empty())?;
        Some(Message {
            id,
            meaning: self.meaning,
            description: self.description,
            parts: self.parts,
        })
    }
}
