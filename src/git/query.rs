//! Argument vectors for the git queries the stats engine issues.

pub fn default_branch() -> Vec<String> {
    args(["symbolic-ref", "--short", "refs/remotes/origin/HEAD"])
}

/// Contributors with commit counts, most commits first.
pub fn shortlog(branch: &str) -> Vec<String> {
    args(["shortlog", "-sn", branch])
}

/// One short date per commit across the checked-out history.
pub fn commit_dates() -> Vec<String> {
    args(["log", "--date=short", "--pretty=format:%ad"])
}

/// `<hash> <date>` per commit authored by `author`.
pub fn author_commits(author: &str) -> Vec<String> {
    author_log(author, ["--date=short", "--pretty=format:%H %ad"])
}

/// Date line per commit authored by `author`, followed by its numstat lines.
pub fn author_numstat(author: &str) -> Vec<String> {
    author_log(author, ["--date=short", "--pretty=format:%ad", "--numstat"])
}

/// `git log` restricted to one author. `--basic-regexp` overrides any
/// `grep.patternType` from the user's config so the escaping below holds.
fn author_log<const N: usize>(author: &str, rest: [&str; N]) -> Vec<String> {
    let mut argv = args(["log", "--basic-regexp"]);
    argv.push(author_filter(author));
    argv.extend(args(rest));
    argv
}

/// `--author` matches against `Name <email>`; anchoring on both sides keeps
/// "Al" from matching "Alice".
fn author_filter(author: &str) -> String {
    format!("--author=^{} <", escape_basic_regex(author))
}

fn escape_basic_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '.' | '[' | ']' | '*' | '^' | '$') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
