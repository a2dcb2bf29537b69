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

//! Line-oriented parser turning PO message blocks into [`Message`]s.
//!
//! A PO file is a sequence of blank-line-separated blocks. Within a
//! block, `#:` comments carry the message id and the plural variable,
//! `msgctxt` carries the description, `msgid` holds the untranslated
//! source (ignored here), and `msgstr` or `msgstr[N]` hold the
//! translation. A quoted value may continue across lines; every
//! continuation line starts with `"` and extends the field opened on a
//! previous line.
//!
//! For more information about PO files, see:
//! <http://www.gnu.org/software/gettext/manual/html_node/PO-Files.html>

use std::sync::OnceLock;

use regex::Regex;

use crate::error::PoError;
use crate::message::{Message, MessageBuilder};

const ID_PREFIX: &str = "#: id=";
const PLURAL_VAR_PREFIX: &str = "#: pluralVar=";
const MESSAGE_CONTEXT_PREFIX: &str = "msgctxt ";
const SOURCE_MESSAGE_PREFIX: &str = "msgid ";
const SINGULAR_TRANSLATION_PREFIX: &str = "msgstr ";
const PLURAL_TRANSLATION_PREFIX: &str = "msgstr[";

/// Split a PO file into its blank-line-separated message blocks.
///
/// Order is preserved. Empty pieces, such as the one after a trailing
/// blank line, are passed through; they yield no message downstream.
pub(crate) fn split_blocks(content: &str) -> impl Iterator<Item = &str> {
    content.split("\n\n")
}

/// The field a line contributes to, determined by its prefix alone.
///
/// Whether a `Continuation` is legal depends on the state of the
/// caller, not on the line itself.
#[derive(Debug, PartialEq)]
enum LineKind<'a> {
    IdComment(&'a str),
    PluralVarComment(&'a str),
    Context,
    SourceMessage,
    SingularTranslation,
    PluralTranslation,
    Continuation,
    Ignored,
}

fn classify(line: &str) -> LineKind<'_> {
    if line.starts_with('"') {
        LineKind::Continuation
    } else if let Some(id) = line.strip_prefix(ID_PREFIX) {
        LineKind::IdComment(id)
    } else if let Some(var) = line.strip_prefix(PLURAL_VAR_PREFIX) {
        LineKind::PluralVarComment(var)
    } else if line.starts_with(SOURCE_MESSAGE_PREFIX) {
        LineKind::SourceMessage
    } else if line.starts_with(PLURAL_TRANSLATION_PREFIX) {
        LineKind::PluralTranslation
    } else if line.starts_with(SINGULAR_TRANSLATION_PREFIX) {
        LineKind::SingularTranslation
    } else if line.starts_with(MESSAGE_CONTEXT_PREFIX) {
        LineKind::Context
    } else {
        // Translator comments, source references, flags and the like.
        LineKind::Ignored
    }
}

/// Which field of the current block is open for more input.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ParseState {
    Message,
    Context,
    SourceMessageIgnored,
    SingularTranslation,
    OuterPluralTranslation,
    InnerPluralTranslation,
}

/// Parses one message block, accumulating fields into a builder.
///
/// All parse state lives on the assembler and one assembler handles
/// exactly one block, so bundles constructed concurrently from
/// different files cannot observe each other's state.
pub(crate) struct MessageAssembler {
    state: ParseState,
    builder: MessageBuilder,
    description: String,
    /// Whether an outer plural expression was opened by a
    /// `#: pluralVar=` comment and still needs its closing `}`.
    plural_open: bool,
}

impl MessageAssembler {
    pub(crate) fn new() -> MessageAssembler {
        MessageAssembler {
            state: ParseState::Message,
            builder: MessageBuilder::new(),
            description: String::new(),
            plural_open: false,
        }
    }

    /// Parse one block into a message.
    ///
    /// Returns `None` for blocks that carry no `#: id=` comment, such
    /// as the PO header block.
    pub(crate) fn parse_block(mut self, block: &str) -> Result<Option<Message>, PoError> {
        for line in block.lines() {
            match classify(line) {
                LineKind::Continuation => self.parse_continuing_line(line)?,
                kind => {
                    // A non-continuation line closes any plural case
                    // still open from a previous line.
                    self.end_translation();
                    self.parse_line(kind, line)?;
                }
            }
        }

        self.end_translation();
        if self.plural_open {
            self.builder.append_string_part("}");
        }
        if !self.description.is_empty() {
            self.builder.set_description(&self.description);
        }
        Ok(self.builder.build())
    }

    fn parse_line(&mut self, kind: LineKind, line: &str) -> Result<(), PoError> {
        match kind {
            LineKind::IdComment(id) => self.builder.set_key(id.trim()),
            LineKind::PluralVarComment(var) => {
                // One trailing space here; the case label brings the
                // second one.
                self.builder
                    .append_string_part(&format!("{{{} ,plural, offset:0 ", var.trim()));
                self.plural_open = true;
            }
            LineKind::SourceMessage => self.state = ParseState::SourceMessageIgnored,
            LineKind::SingularTranslation => {
                self.state = ParseState::SingularTranslation;
                append_translation(&mut self.builder, unquote(line)?, false);
            }
            LineKind::PluralTranslation => {
                self.state = ParseState::OuterPluralTranslation;
                self.parse_plural_translation_line(line)?;
            }
            LineKind::Context => {
                self.state = ParseState::Context;
                self.description.push_str(unquote(line)?);
            }
            // Continuations are routed by the caller before dispatch.
            LineKind::Continuation | LineKind::Ignored => {}
        }
        Ok(())
    }

    fn parse_continuing_line(&mut self, line: &str) -> Result<(), PoError> {
        match self.state {
            ParseState::SingularTranslation => {
                append_translation(&mut self.builder, unquote(line)?, false);
            }
            ParseState::InnerPluralTranslation => {
                append_translation(&mut self.builder, unquote(line)?, true);
            }
            ParseState::Context => self.description.push_str(unquote(line)?),
            // The untranslated source text is not used.
            ParseState::SourceMessageIgnored => {}
            ParseState::Message | ParseState::OuterPluralTranslation => {
                return Err(PoError::UnexpectedContinuation {
                    line: String::from(line),
                });
            }
        }
        Ok(())
    }

    /// Parse one `msgstr[N] "..."` line into the builder.
    ///
    /// Index 0 holds the explicit one case in this pipeline; every
    /// other index maps to the ICU fallback case.
    // TODO: support explicit ICU number cases beyond =1.
    fn parse_plural_translation_line(&mut self, line: &str) -> Result<(), PoError> {
        static INDEX: OnceLock<Regex> = OnceLock::new();
        let re = INDEX
            .get_or_init(|| Regex::new(r"^msgstr\[(?<index>[^\]]*)\]").expect("well-formed regex"));

        let index: u32 = re
            .captures(line)
            .and_then(|captures| captures["index"].parse().ok())
            .ok_or_else(|| PoError::MalformedPluralIndex {
                line: String::from(line),
            })?;

        let label = if index == 0 { " =1 {" } else { " other {" };
        self.builder.append_string_part(label);
        self.state = ParseState::InnerPluralTranslation;
        append_translation(&mut self.builder, unquote(line)?, true);
        Ok(())
    }

    /// Close the plural case opened by the previous `msgstr[N]` line
    /// and return to the neutral state. Idempotent when no case is
    /// open.
    fn end_translation(&mut self) {
        if matches!(
            self.state,
            ParseState::OuterPluralTranslation | ParseState::InnerPluralTranslation
        ) {
            self.builder.append_string_part("}");
        }
        self.state = ParseState::Message;
    }
}

/// Tokenize a translation string into literal and placeholder parts.
///
/// Tokens alternate between literal text and `{$name}` placeholders.
/// Outside a plural case the placeholder name is normalized and
/// appended as a structured reference. Inside a plural case the
/// placeholder is re-emitted as literal `{name}` text: an ICU plural
/// body is itself message syntax, so a nested variable has to stay in
/// the text.
fn append_translation(builder: &mut MessageBuilder, text: &str, inside_plural: bool) {
    static DELIMITERS: OnceLock<Regex> = OnceLock::new();
    let re = DELIMITERS.get_or_init(|| Regex::new(r"\{\$|\}").expect("well-formed regex"));

    let mut in_placeholder = text.starts_with("{$");
    let mut tokens = re.split(text);
    if in_placeholder || text.starts_with('}') {
        // Skip the empty token in front of a leading delimiter.
        tokens.next();
    }
    for token in tokens {
        if in_placeholder && inside_plural {
            builder.append_string_part(&format!("{{{token}}}"));
        } else if in_placeholder {
            builder.append_placeholder_reference(&to_lower_camel_case_with_numeric_suffixes(token));
        } else {
            builder.append_string_part(&unescape(token));
        }
        in_placeholder = !in_placeholder;
    }
}

/// Everything between the first and the last quote of the line.
///
/// Examples:
/// `msgstr "this is translated"` => `this is translated`,
/// `"also translated"` => `also translated`.
fn unquote(line: &str) -> Result<&str, PoError> {
    match (line.find('"'), line.rfind('"')) {
        (Some(first), Some(last)) if first != last => Ok(&line[first + 1..last]),
        _ => Err(PoError::MalformedQuoting {
            line: String::from(line),
        }),
    }
}

/// Unescape the two escape sequences quoted PO values carry: `\"`
/// becomes a quote and `\n` becomes a newline.
fn unescape(text: &str) -> String {
    text.replace("\\\"", "\"").replace("\\n", "\n")
}

/// Normalize a placeholder name to lower camel case, keeping any
/// trailing `_<digits>` groups verbatim: `USER_NAME` => `userName`,
/// `NUM_ITEMS_1` => `numItems_1`.
fn to_lower_camel_case_with_numeric_suffixes(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut suffix_start = name.len();
    loop {
        let mut number_start = suffix_start;
        while number_start > 0 && bytes[number_start - 1].is_ascii_digit() {
            number_start -= 1;
        }
        if number_start > 0 && number_start < suffix_start && bytes[number_start - 1] == b'_' {
            suffix_start = number_start - 1;
        } else {
            break;
        }
    }
    format!(
        "{}{}",
        to_lower_camel_case(&name[..suffix_start]),
        &name[suffix_start..]
    )
}

fn to_lower_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize_next = false;
    for ch in name.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessagePart;
    use pretty_assertions::assert_eq;

    fn parse_single(block: &str) -> Message {
        MessageAssembler::new()
            .parse_block(block)
            .expect("block failed to parse")
            .expect("block produced no message")
    }

    fn literal(text: &str) -> MessagePart {
        MessagePart::Literal(String::from(text))
    }

    fn placeholder(name: &str) -> MessagePart {
        MessagePart::Placeholder(String::from(name))
    }

    #[test]
    fn test_split_blocks() {
        let blocks = split_blocks("first\nblock\n\nsecond block\n\nthird").collect::<Vec<_>>();
        assert_eq!(blocks, &["first\nblock", "second block", "third"]);
    }

    #[test]
    fn test_classify_by_prefix() {
        assert_eq!(classify("#: id=GREETING"), LineKind::IdComment("GREETING"));
        assert_eq!(classify("#: pluralVar=n"), LineKind::PluralVarComment("n"));
        assert_eq!(classify("msgctxt \"greeting\""), LineKind::Context);
        assert_eq!(classify("msgid \"Hello\""), LineKind::SourceMessage);
        assert_eq!(classify("msgstr \"Bonjour\""), LineKind::SingularTranslation);
        assert_eq!(classify("msgstr[0] \"Bonjour\""), LineKind::PluralTranslation);
        assert_eq!(classify("\"Bonjour\""), LineKind::Continuation);
        assert_eq!(classify("# translator note"), LineKind::Ignored);
        assert_eq!(classify("#, fuzzy"), LineKind::Ignored);
        assert_eq!(classify("#: src/app.js:10"), LineKind::Ignored);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("msgstr \"this is translated\"").unwrap(), "this is translated");
        assert_eq!(unquote("\"also translated\"").unwrap(), "also translated");
    }

    #[test]
    fn test_unquote_requires_two_quotes() {
        assert!(matches!(
            unquote("msgstr translated"),
            Err(PoError::MalformedQuoting { .. })
        ));
        assert!(matches!(
            unquote("msgstr \"translated"),
            Err(PoError::MalformedQuoting { .. })
        ));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a \"quoted\" word"#), "a \"quoted\" word");
        assert_eq!(unescape(r"line\nbreak"), "line\nbreak");
    }

    #[test]
    fn test_lower_camel_case_with_numeric_suffixes() {
        assert_eq!(to_lower_camel_case_with_numeric_suffixes("USER_NAME"), "userName");
        assert_eq!(to_lower_camel_case_with_numeric_suffixes("NUM_ITEMS_1"), "numItems_1");
        assert_eq!(to_lower_camel_case_with_numeric_suffixes("FOO_1_2"), "foo_1_2");
        assert_eq!(to_lower_camel_case_with_numeric_suffixes("n"), "n");
        assert_eq!(to_lower_camel_case_with_numeric_suffixes("alreadyCamel"), "alreadycamel");
    }

    #[test]
    fn test_singular_message() {
        let message = parse_single(
            "#: id=GREETING\n\
             msgid \"Hello\"\n\
             msgstr \"Bonjour\"",
        );
        assert_eq!(message.id(), "GREETING");
        assert_eq!(message.parts(), &[literal("Bonjour")]);
    }

    #[test]
    fn test_singular_message_with_placeholders() {
        let message = parse_single(
            "#: id=FAREWELL\n\
             msgid \"Goodbye {$USER_NAME}!\"\n\
             msgstr \"Au revoir {$USER_NAME} !\"",
        );
        assert_eq!(
            message.parts(),
            &[
                literal("Au revoir "),
                placeholder("userName"),
                literal(" !"),
            ]
        );
    }

    #[test]
    fn test_adjacent_placeholders() {
        let message = parse_single(
            "#: id=RATIO\n\
             msgstr \"{$NUMERATOR}{$DENOMINATOR}\"",
        );
        assert_eq!(
            message.parts(),
            &[placeholder("numerator"), placeholder("denominator")]
        );
    }

    #[test]
    fn test_multi_line_translation() {
        let message = parse_single(
            "#: id=PARAGRAPH\n\
             msgstr \"first half \"\n\
             \"second half\"",
        );
        assert_eq!(message.parts(), &[literal("first half second half")]);
    }

    #[test]
    fn test_escape_sequences_in_translation() {
        let message = parse_single(
            "#: id=QUOTE\n\
             msgstr \"Il a dit \\\"bonjour\\\"\\npuis partit\"",
        );
        assert_eq!(
            message.parts(),
            &[literal("Il a dit \"bonjour\"\npuis partit")]
        );
    }

    #[test]
    fn test_plural_message_renders_icu() {
        let message = parse_single(
            "#: id=ITEM_COUNT\n\
             #: pluralVar=n\n\
             msgid \"{$n} items\"\n\
             msgstr[0] \"{$n} article\"\n\
             msgstr[1] \"{$n} articles\"",
        );
        assert_eq!(
            message.icu_text(),
            "{n ,plural, offset:0  =1 {{n} article} other {{n} articles}}"
        );
        // Everything inside the plural expression is literal text.
        assert_eq!(message.parts().len(), 1);
    }

    #[test]
    fn test_plural_keeps_placeholder_names_verbatim() {
        let message = parse_single(
            "#: id=USER_COUNT\n\
             #: pluralVar=NUM_USERS\n\
             msgstr[0] \"{$NUM_USERS} user\"\n\
             msgstr[1] \"{$NUM_USERS} users\"",
        );
        assert_eq!(
            message.icu_text(),
            "{NUM_USERS ,plural, offset:0  =1 {{NUM_USERS} user} other {{NUM_USERS} users}}"
        );
    }

    #[test]
    fn test_plural_case_continuation_lines() {
        let message = parse_single(
            "#: id=ITEM_COUNT\n\
             #: pluralVar=n\n\
             msgstr[0] \"{$n} art\"\n\
             \"icle\"\n\
             msgstr[1] \"{$n} articles\"",
        );
        assert_eq!(
            message.icu_text(),
            "{n ,plural, offset:0  =1 {{n} article} other {{n} articles}}"
        );
    }

    #[test]
    fn test_plural_indexes_beyond_one_map_to_other() {
        let message = parse_single(
            "#: id=ITEM_COUNT\n\
             #: pluralVar=n\n\
             msgstr[0] \"one\"\n\
             msgstr[2] \"many\"",
        );
        assert_eq!(
            message.icu_text(),
            "{n ,plural, offset:0  =1 {one} other {many}}"
        );
    }

    #[test]
    fn test_context_becomes_description() {
        let message = parse_single(
            "#: id=GREETING\n\
             msgctxt \"Greeting shown\"\n\
             \" on the landing page\"\n\
             msgid \"Hello\"\n\
             msgstr \"Bonjour\"",
        );
        assert_eq!(
            message.description(),
            Some("Greeting shown on the landing page")
        );
    }

    #[test]
    fn test_source_message_continuations_are_discarded() {
        let message = parse_single(
            "#: id=GREETING\n\
             msgid \"Hello \"\n\
             \"world\"\n\
             msgstr \"Bonjour\"",
        );
        assert_eq!(message.parts(), &[literal("Bonjour")]);
    }

    #[test]
    fn test_continuation_without_open_field_fails() {
        let result = MessageAssembler::new().parse_block(
            "#: id=GREETING\n\
             \"Bonjour\"",
        );
        assert!(matches!(
            result,
            Err(PoError::UnexpectedContinuation { .. })
        ));
    }

    #[test]
    fn test_non_numeric_plural_index_fails() {
        let result = MessageAssembler::new().parse_block(
            "#: id=ITEM_COUNT\n\
             #: pluralVar=n\n\
             msgstr[x] \"article\"",
        );
        assert!(matches!(
            result,
            Err(PoError::MalformedPluralIndex { .. })
        ));
    }

    #[test]
    fn test_unclosed_plural_index_fails() {
        let result = MessageAssembler::new().parse_block(
            "#: id=ITEM_COUNT\n\
             #: pluralVar=n\n\
             msgstr[0 \"article\"",
        );
        assert!(matches!(
            result,
            Err(PoError::MalformedPluralIndex { .. })
        ));
    }

    #[test]
    fn test_unquoted_translation_fails() {
        let result = MessageAssembler::new().parse_block(
            "#: id=GREETING\n\
             msgstr Bonjour",
        );
        assert!(matches!(result, Err(PoError::MalformedQuoting { .. })));
    }

    #[test]
    fn test_header_block_produces_no_message() {
        let result = MessageAssembler::new().parse_block(
            "msgid \"\"\n\
             msgstr \"\"\n\
             \"Project-Id-Version: demo\\n\"\n\
             \"Language: fr\\n\"",
        );
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn test_empty_translation_yields_empty_parts() {
        let message = parse_single(
            "#: id=BLANK\n\
             msgstr \"\"",
        );
        assert!(message.parts().is_empty());
    }
}
