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

//! Load Gettext PO translations into ICU-style message bundles.
//!
//! A PO file coming back from a translation pipeline is parsed into a
//! [`MessageBundle`]: a collection of immutable [`Message`] records keyed
//! by the message id carried in each entry's `#: id=` comment. Every
//! message stores its translation as an ordered sequence of
//! [`MessagePart`]s, either literal text or a named placeholder
//! reference for a value substituted at runtime.
//!
//! Plural entries (`msgstr[0]`, `msgstr[1]`, ...) are folded into a
//! single ICU plural expression. Inside a plural case a `{$name}`
//! placeholder stays in the text as literal `{name}`, since an ICU
//! plural body is itself message syntax; outside plural context it
//! becomes a structured placeholder reference.
//!
//! The parser is a single pass over the file: blank lines separate
//! message blocks, and within a block each line either opens a field
//! (`msgctxt`, `msgid`, `msgstr`, a `#:` comment) or continues the one
//! opened before it. A malformed block aborts the whole bundle; a
//! partially loaded bundle is not safe to localize with.

mod bundle;
mod error;
mod message;
mod parser;

pub use crate::bundle::{IdGenerator, MessageBundle};
pub use crate::error::PoError;
pub use crate::message::{Message, MessageBuilder, MessagePart};
