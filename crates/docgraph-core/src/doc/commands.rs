//! Command tables for documentation comments
//!
//! A backslash command at the start of a comment line is either a topic
//! command (it says what entity the comment documents) or a metacommand (it
//! annotates the entity). Anything else stays in the body text.

/// Commands that bind a comment to an entity
const TOPIC_COMMANDS: &[&str] = &[
    "class",
    "dontdocument",
    "enum",
    "example",
    "externalpage",
    "fn",
    "group",
    "headerfile",
    "macro",
    "module",
    "namespace",
    "page",
    "property",
    "qmlattachedmethod",
    "qmlattachedproperty",
    "qmlattachedsignal",
    "qmlbasictype",
    "qmlclass",
    "qmlmethod",
    "qmlmodule",
    "qmlproperty",
    "qmlsignal",
    "qmltype",
    "struct",
    "typealias",
    "typedef",
    "union",
    "variable",
];

/// Commands that annotate the documented entity
const META_COMMANDS: &[&str] = &[
    "abstract",
    "attribution",
    "brief",
    "default",
    "deprecated",
    "ingroup",
    "inherits",
    "inmodule",
    "inqmlmodule",
    "instantiates",
    "internal",
    "keyword",
    "nativetype",
    "nonreentrant",
    "obsolete",
    "overload",
    "preliminary",
    "qmlabstract",
    "readonly",
    "reentrant",
    "reimp",
    "relates",
    "required",
    "since",
    "subtitle",
    "target",
    "threadsafe",
    "title",
    "wrapper",
];

/// Returns true for a command that selects the documented entity
#[must_use]
pub fn is_topic_command(name: &str) -> bool {
    TOPIC_COMMANDS.binary_search(&name).is_ok()
}

/// Returns true for a command that annotates the documented entity
#[must_use]
pub fn is_meta_command(name: &str) -> bool {
    META_COMMANDS.binary_search(&name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_sorted_for_binary_search() {
        let mut topics = TOPIC_COMMANDS.to_vec();
        topics.sort_unstable();
        assert_eq!(topics, TOPIC_COMMANDS);
        let mut metas = META_COMMANDS.to_vec();
        metas.sort_unstable();
        assert_eq!(metas, META_COMMANDS);
    }

    #[test]
    fn classification() {
        assert!(is_topic_command("fn"));
        assert!(is_topic_command("qmlproperty"));
        assert!(is_topic_command("qmlattachedmethod"));
        assert!(is_meta_command("internal"));
        assert!(is_meta_command("since"));
        assert!(!is_topic_command("internal"));
        assert!(!is_meta_command("fn"));
        assert!(!is_meta_command("bold"));
    }
}
