use std::sync::LazyLock;

use regex::Regex;

static JS_PROTOCOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("protocol pattern compiles"));
static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+=").expect("handler pattern compiles"));

/// Strip the known markup-injection fragments from a free-text field.
///
/// Passes run in order, each over the previous pass's output: trim, drop angle
/// brackets, drop `javascript:` (any case), drop `on<word>=` event-handler
/// fragments (any case). This is a denylist, not a parser; server-side
/// encoding remains the collaborator's responsibility.
pub fn sanitize_input(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let without_brackets: String = trimmed.chars().filter(|c| *c != '<' && *c != '>').collect();
    let without_protocol = JS_PROTOCOL.replace_all(&without_brackets, "");
    EVENT_HANDLER.replace_all(&without_protocol, "").into_owned()
}
