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

//! The parsed message bundle and the id-generation capability.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use crate::error::PoError;
use crate::message::Message;
use crate::parser::{split_blocks, MessageAssembler};

/// Maps a message `(meaning, key)` pair to its canonical id.
///
/// Id generation belongs to the surrounding compiler and is injected
/// at bundle construction. The bundle itself never calls it while
/// parsing, since PO entries carry their id in the `#: id=` comment;
/// it only keeps the generator around so downstream consumers can
/// derive ids for messages that have no translation in the bundle.
pub trait IdGenerator {
    /// Generate the canonical id for a message.
    fn generate(&self, meaning: Option<&str>, key: &str) -> String;
}

/// A set of localizable messages parsed from one PO file.
///
/// Messages are keyed by id. When one file contains two entries with
/// the same id, the later entry replaces the earlier one. The bundle
/// is immutable once constructed.
pub struct MessageBundle {
    messages: HashMap<String, Message>,
    id_generator: Box<dyn IdGenerator>,
}

impl MessageBundle {
    /// Parse a message bundle from PO file content.
    ///
    /// `project_id` names the translation project the id generator is
    /// keyed by; it must not be empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use po_message_bundle::{IdGenerator, MessageBundle};
    ///
    /// struct KeyIds;
    ///
    /// impl IdGenerator for KeyIds {
    ///     fn generate(&self, _meaning: Option<&str>, key: &str) -> String {
    ///         key.to_string()
    ///     }
    /// }
    ///
    /// let po = "#: id=GREETING\n\
    ///           msgid \"Hello\"\n\
    ///           msgstr \"Bonjour\"\n";
    /// let bundle = MessageBundle::parse(po, "my-project", Box::new(KeyIds))?;
    /// assert_eq!(bundle.get("GREETING").unwrap().icu_text(), "Bonjour");
    /// # Ok::<(), po_message_bundle::PoError>(())
    /// ```
    pub fn parse(
        po_content: &str,
        project_id: &str,
        id_generator: Box<dyn IdGenerator>,
    ) -> Result<MessageBundle, PoError> {
        if project_id.is_empty() {
            return Err(PoError::InvalidProjectId);
        }

        let mut messages = HashMap::new();
        for block in split_blocks(po_content) {
            if let Some(message) = MessageAssembler::new().parse_block(block)? {
                messages.insert(String::from(message.id()), message);
            }
        }
        Ok(MessageBundle {
            messages,
            id_generator,
        })
    }

    /// Parse a message bundle from a PO byte stream.
    ///
    /// The stream is read to the end before parsing starts. Read
    /// failures surface as [`PoError::Io`], distinct from the parse
    /// failure kinds.
    pub fn from_reader<R: Read>(
        mut reader: R,
        project_id: &str,
        id_generator: Box<dyn IdGenerator>,
    ) -> Result<MessageBundle, PoError> {
        let mut po_content = String::new();
        reader.read_to_string(&mut po_content)?;
        MessageBundle::parse(&po_content, project_id, id_generator)
    }

    /// Look up a message by id.
    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.get(id)
    }

    /// Iterate over all messages, in no particular order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    /// The number of messages in the bundle.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The id generator injected at construction.
    pub fn id_generator(&self) -> &dyn IdGenerator {
        self.id_generator.as_ref()
    }
}

impl fmt::Debug for MessageBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBundle")
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}
