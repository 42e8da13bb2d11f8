//! Command rendering
//!
//! Expands `{{ Var }}` placeholders in an action's command template and
//! splits the result into a program and its arguments.
//!
//! Only the five command-line variables are recognized. Anything else that
//! looks like a placeholder (`{{ Bogus }}`, `{{Path`) is left verbatim, so a
//! malformed hook fails visibly when its command runs instead of silently
//! running something else.

use super::vars::{CommandLineVar, CommandLineVars};
use std::borrow::Cow;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";

/// Substitute every recognized placeholder with its current value
///
/// Unset variables expand to the empty string. Substitution is a single pass:
/// values are never rescanned for placeholders.
///
/// Uses Cow to avoid allocation when the template contains no placeholder.
///
/// # Examples
///
/// ```
/// use devhook_engine::hooks::command::render;
/// use devhook_engine::hooks::vars::{CommandLineVar, CommandLineVars};
///
/// let mut vars = CommandLineVars::default();
/// vars.set(CommandLineVar::Path, "/etc/app/");
///
/// assert_eq!(render("ls {{Path}}", &vars), "ls /etc/app/");
/// assert_eq!(render("ls {{ Nope }}", &vars), "ls {{ Nope }}");
/// ```
pub fn render<'t>(template: &'t str, vars: &CommandLineVars) -> Cow<'t, str> {
    if !template.contains(LEFT_DELIM) {
        return Cow::Borrowed(template);
    }

    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(LEFT_DELIM) {
        result.push_str(&rest[..start]);
        let candidate = &rest[start..];

        if let Some((var, len)) = parse_placeholder(candidate) {
            result.push_str(vars.get(var));
            rest = &candidate[len..];
        } else {
            // Not a placeholder here; retry from the next character so that
            // `{{{Path}}` still finds the inner `{{Path}}`
            result.push('{');
            rest = &candidate[1..];
        }
    }

    result.push_str(rest);
    Cow::Owned(result)
}

/// Parse `{{ Name }}` at the start of `s`
///
/// Returns the variable and the byte length of the whole placeholder.
fn parse_placeholder(s: &str) -> Option<(CommandLineVar, usize)> {
    let inner = s.strip_prefix(LEFT_DELIM)?.trim_start();
    let name_len = inner
        .find(|c: char| c.is_whitespace() || c == '}')
        .unwrap_or(inner.len());
    let var = CommandLineVar::from_name(&inner[..name_len])?;
    let tail = inner[name_len..].trim_start().strip_prefix(RIGHT_DELIM)?;
    Some((var, s.len() - tail.len()))
}

/// Split a rendered command line into program and arguments
///
/// Splits on whitespace, except inside double-quoted spans. Quote characters
/// are kept as part of the argument; there is no escaping or nesting. An
/// empty command yields an empty program and no arguments.
///
/// # Examples
///
/// ```
/// use devhook_engine::hooks::command::split_command_and_args;
///
/// let (program, args) = split_command_and_args("systemctl restart someservice");
/// assert_eq!(program, "systemctl");
/// assert_eq!(args, vec!["restart", "someservice"]);
/// ```
pub fn split_command_and_args(command: &str) -> (String, Vec<String>) {
    let mut parts = split_with_quotes(command).into_iter();
    match parts.next() {
        Some(program) => (program, parts.collect()),
        None => (String::new(), Vec::new()),
    }
}

fn split_with_quotes(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in s.chars() {
        if c == '"' {
            quoted = !quoted;
        }

        if !quoted && c.is_whitespace() {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
