//! Documentation comment model
//!
//! [`Doc`] is the parsed form of one documentation comment block: brief text,
//! body text, the topic commands that say what the comment documents, and the
//! metacommands that annotate it. A `Doc` is a value object, immutable once
//! parsed, attached to nodes by the database.

mod commands;

use std::collections::BTreeMap;

pub use commands::{is_meta_command, is_topic_command};

use crate::location::Location;

/// A topic command and its argument text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// The command name without the backslash, e.g. `fn`
    pub command: String,
    /// The rest of the command line, e.g. a function signature
    pub args: String,
}

/// One argument given to a metacommand, with the line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgLocation {
    pub text: String,
    pub location: Location,
}

/// A parsed documentation comment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doc {
    location: Location,
    brief: String,
    body: String,
    topics: Vec<Topic>,
    metacommands: BTreeMap<String, Vec<ArgLocation>>,
}

impl Doc {
    /// Parse the interior of a documentation comment
    ///
    /// `text` is the comment with its delimiters already removed; a leading
    /// `*` per line (block-comment decoration) is tolerated and stripped.
    #[must_use]
    pub fn parse(text: &str, location: Location) -> Self {
        DocParser::new(location).run(text)
    }

    /// Where the comment starts
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The `\brief` text, possibly empty
    #[must_use]
    pub fn brief(&self) -> &str {
        &self.brief
    }

    /// The body text with commands removed
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true if the comment carries no text and no commands
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brief.is_empty()
            && self.body.is_empty()
            && self.topics.is_empty()
            && self.metacommands.is_empty()
    }

    /// All topic commands, in order of appearance
    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// The first topic command, if any
    #[must_use]
    pub fn topic(&self) -> Option<&Topic> {
        self.topics.first()
    }

    /// Returns true if the named metacommand appears
    #[must_use]
    pub fn has_metacommand(&self, name: &str) -> bool {
        self.metacommands.contains_key(name)
    }

    /// Arguments given to the named metacommand
    #[must_use]
    pub fn metacommand_args(&self, name: &str) -> &[ArgLocation] {
        self.metacommands.get(name).map_or(&[], |v| v.as_slice())
    }

    /// The first argument of the named metacommand, if any
    #[must_use]
    pub fn metacommand_arg(&self, name: &str) -> Option<&str> {
        self.metacommands
            .get(name)
            .and_then(|v| v.first())
            .map(|a| a.text.as_str())
    }

    /// Names of all metacommands used
    pub fn metacommands_used(&self) -> impl Iterator<Item = &str> {
        self.metacommands.keys().map(|k| k.as_str())
    }

    /// Returns true for a `\reimp` comment
    ///
    /// Reimplementation comments are placeholders and never trigger the
    /// duplicate-documentation warning.
    #[must_use]
    pub fn is_marked_reimp(&self) -> bool {
        self.has_metacommand("reimp")
    }

    /// The `\since` version string, if any
    #[must_use]
    pub fn since(&self) -> Option<&str> {
        self.metacommand_arg("since")
    }

    /// The `\keyword` arguments
    #[must_use]
    pub fn keywords(&self) -> &[ArgLocation] {
        self.metacommand_args("keyword")
    }

    /// The `\target` arguments
    #[must_use]
    pub fn targets(&self) -> &[ArgLocation] {
        self.metacommand_args("target")
    }
}

struct DocParser {
    location: Location,
    doc: Doc,
    body: String,
    in_brief: bool,
}

impl DocParser {
    fn new(location: Location) -> Self {
        let doc = Doc {
            location: location.clone(),
            ..Doc::default()
        };
        Self {
            location,
            doc,
            body: String::new(),
            in_brief: false,
        }
    }

    fn run(mut self, text: &str) -> Doc {
        for (offset, raw_line) in text.lines().enumerate() {
            let line = strip_decoration(raw_line);
            let line_location = Location::new(
                self.location.file_path.clone(),
                self.location.line + offset as u32,
                1,
            );
            self.take_line(line, line_location);
        }
        self.doc.brief = self.doc.brief.trim().to_string();
        self.doc.body = self.body.trim().to_string();
        self.doc
    }

    fn take_line(&mut self, line: &str, location: Location) {
        let Some((command, args)) = split_command(line) else {
            if self.in_brief {
                if line.trim().is_empty() {
                    self.in_brief = false;
                } else {
                    self.doc.brief.push(' ');
                    self.doc.brief.push_str(line.trim());
                    return;
                }
            }
            self.body.push_str(line);
            self.body.push('\n');
            return;
        };

        self.in_brief = false;
        if command == "brief" {
            self.doc.brief.push_str(args.trim());
            self.in_brief = true;
        } else if is_topic_command(command) {
            self.doc.topics.push(Topic {
                command: command.to_string(),
                args: args.trim().to_string(),
            });
        } else if is_meta_command(command) {
            self.doc
                .metacommands
                .entry(command.to_string())
                .or_default()
                .push(ArgLocation {
                    text: args.trim().to_string(),
                    location,
                });
        } else {
            // Unknown commands are markup for the generators, keep them
            self.body.push_str(line);
            self.body.push('\n');
        }
    }
}

/// Strip leading whitespace and one block-comment `*` decoration
fn strip_decoration(line: &str) -> &str {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix('*') {
        // "*/" is part of markup, not decoration
        if !rest.starts_with('/') {
            return rest.strip_prefix(' ').unwrap_or(rest);
        }
    }
    trimmed
}

/// Split a `\command args` line, if that is what it is
fn split_command(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('\\')?;
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some((&rest[..end], &rest[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Doc {
        Doc::parse(text, Location::new("qstring.cpp", 100, 1))
    }

    #[test]
    fn topic_and_brief() {
        let doc = parse(
            "\\class QString\n\
             \\brief The QString class provides a Unicode string.\n\
             \n\
             QString stores a string of 16-bit QChars.",
        );
        let topic = doc.topic().unwrap();
        assert_eq!(topic.command, "class");
        assert_eq!(topic.args, "QString");
        assert_eq!(doc.brief(), "The QString class provides a Unicode string.");
        assert_eq!(doc.body(), "QString stores a string of 16-bit QChars.");
    }

    #[test]
    fn brief_continuation_ends_at_blank_line() {
        let doc = parse(
            "\\brief Provides a Unicode\n\
             string class.\n\
             \n\
             Body starts here.",
        );
        assert_eq!(doc.brief(), "Provides a Unicode string class.");
        assert_eq!(doc.body(), "Body starts here.");
    }

    #[test]
    fn metacommands_collect_all_arguments() {
        let doc = parse(
            "\\fn void QWidget::show()\n\
             \\since 5.7\n\
             \\ingroup widgets\n\
             \\ingroup visible\n\
             Shows the widget.",
        );
        assert_eq!(doc.since(), Some("5.7"));
        let groups: Vec<&str> = doc
            .metacommand_args("ingroup")
            .iter()
            .map(|a| a.text.as_str())
            .collect();
        assert_eq!(groups, ["widgets", "visible"]);
        assert_eq!(doc.metacommand_args("ingroup")[0].location.line, 102);
    }

    #[test]
    fn multiple_topics_are_kept_in_order() {
        let doc = parse("\\fn int a()\n\\fn int b()\n");
        assert_eq!(doc.topics().len(), 2);
        assert_eq!(doc.topics()[1].args, "int b()");
    }

    #[test]
    fn block_comment_decoration_is_stripped() {
        let doc = parse(
            " * \\class QFile\n\
             * \\internal\n\
             * Handles files.",
        );
        assert_eq!(doc.topic().unwrap().command, "class");
        assert!(doc.has_metacommand("internal"));
        assert_eq!(doc.body(), "Handles files.");
    }

    #[test]
    fn unknown_commands_stay_in_body() {
        let doc = parse("\\class QFile\nSee \\l {QDir} for directories.\n\\warning Be careful.");
        assert!(doc.body().contains("\\l {QDir}"));
        assert!(doc.body().contains("\\warning Be careful."));
    }

    #[test]
    fn reimp_marker() {
        assert!(parse("\\reimp").is_marked_reimp());
        assert!(!parse("Plain text.").is_marked_reimp());
    }

    #[test]
    fn empty_doc() {
        assert!(parse("   \n  ").is_empty());
        assert!(!parse("\\internal").is_empty());
    }
}
