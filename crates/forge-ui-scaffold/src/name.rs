//! Package-name validation
//!
//! Applies npm's naming rules. Violations that make a name unusable anywhere
//! are reported as errors; rules that only apply to newly published packages
//! are reported as warnings. New projects must be free of both.

use regex::Regex;
use std::sync::LazyLock;

/// `@scope/package` or a bare package name
static SCOPED_PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@([^/]+?)[/])?([^/]+?)$").expect("scoped package regex is valid")
});

/// Names npm refuses outright
const RESERVED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

/// Node core modules; a package cannot shadow them
const CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

const MAX_NAME_LENGTH: usize = 214;

/// Outcome of validating a package name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameValidation {
    /// No errors and no warnings
    pub valid_for_new_packages: bool,
    /// No errors
    pub valid_for_old_packages: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl NameValidation {
    fn from_messages(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid_for_new_packages: errors.is_empty() && warnings.is_empty(),
            valid_for_old_packages: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validate `name` against npm package naming rules
///
/// Every rule is evaluated so callers can report all problems at once.
pub fn validate_package_name(name: &str) -> NameValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if name.is_empty() {
        errors.push("name length must be greater than zero".to_string());
    }

    let package = split_scope(name).map_or(name, |(_, package)| package);
    if name.starts_with('.') || package.starts_with('.') {
        errors.push("name cannot start with a period".to_string());
    }

    if name.starts_with('_') {
        errors.push("name cannot start with an underscore".to_string());
    }

    if name.trim() != name {
        errors.push("name cannot contain leading or trailing spaces".to_string());
    }

    for reserved in RESERVED_NAMES {
        if name.to_lowercase() == *reserved {
            errors.push(format!("{} is not a valid package name", reserved));
        }
    }

    if CORE_MODULES.contains(&name.to_lowercase().as_str()) {
        warnings.push(format!("{} is a core module name", name));
    }

    if name.len() > MAX_NAME_LENGTH {
        warnings.push(format!(
            "name can no longer contain more than {} characters",
            MAX_NAME_LENGTH
        ));
    }

    if name.to_lowercase() != name {
        warnings.push("name can no longer contain capital letters".to_string());
    }

    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.contains(['~', '\'', '!', '(', ')', '*']) {
        warnings.push(r#"name can no longer contain special characters ("~'!()*")"#.to_string());
    }

    if !is_url_safe(name) && !is_url_safe_scoped(name) {
        errors.push("name can only contain URL-friendly characters".to_string());
    }

    NameValidation::from_messages(errors, warnings)
}

/// Split `@scope/package` into `(scope, package)`
///
/// Returns `None` for unscoped names.
pub fn split_scope(name: &str) -> Option<(&str, &str)> {
    let captures = SCOPED_PACKAGE_RE.captures(name)?;
    let scope = captures.get(1)?.as_str();
    let package = captures.get(2)?.as_str();
    Some((scope, package))
}

fn is_url_safe_scoped(name: &str) -> bool {
    match split_scope(name) {
        Some((scope, package)) => is_url_safe(scope) && is_url_safe(package),
        None => false,
    }
}

/// Characters a URI component may carry without percent-encoding
fn is_url_safe(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("my-app")]
    #[test_case("some-package")]
    #[test_case("example.com")]
    #[test_case("under_score")]
    #[test_case("period.js")]
    #[test_case("123numeric")]
    #[test_case("@npm/thingy")]
    #[test_case("@jane/foo.js")]
    fn test_valid_names(name: &str) {
        let result = validate_package_name(name);
        assert!(result.valid_for_new_packages, "{name}: {result:?}");
        assert!(result.valid_for_old_packages);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test_case("", "name length must be greater than zero")]
    #[test_case(".start-with-period", "name cannot start with a period")]
    #[test_case("@acme/.hidden", "name cannot start with a period")]
    #[test_case("@acme/..", "name cannot start with a period")]
    #[test_case("_start-with-underscore", "name cannot start with an underscore")]
    #[test_case(" leading-space", "name cannot contain leading or trailing spaces")]
    #[test_case("trailing-space ", "name cannot contain leading or trailing spaces")]
    #[test_case("node_modules", "node_modules is not a valid package name")]
    #[test_case("favicon.ico", "favicon.ico is not a valid package name")]
    #[test_case("s/l/a/s/h/e/s", "name can only contain URL-friendly characters")]
    #[test_case("has space", "name can only contain URL-friendly characters")]
    #[test_case("@scope/has space", "name can only contain URL-friendly characters")]
    fn test_errors(name: &str, expected: &str) {
        let result = validate_package_name(name);
        assert!(
            result.errors.iter().any(|e| e == expected),
            "{name}: {result:?}"
        );
        assert!(!result.valid_for_old_packages);
        assert!(!result.valid_for_new_packages);
    }

    #[test_case("http", "http is a core module name")]
    #[test_case("fs", "fs is a core module name")]
    #[test_case("CAPITAL-LETTERS", "name can no longer contain capital letters")]
    #[test_case("crazy!", r#"name can no longer contain special characters ("~'!()*")"#)]
    #[test_case("@npm/*", r#"name can no longer contain special characters ("~'!()*")"#)]
    #[test_case("@npm-zors/money!time.js", r#"name can no longer contain special characters ("~'!()*")"#)]
    fn test_warnings(name: &str, expected: &str) {
        let result = validate_package_name(name);
        assert!(
            result.warnings.iter().any(|w| w == expected),
            "{name}: {result:?}"
        );
        assert!(result.errors.is_empty(), "{name}: {result:?}");
        assert!(result.valid_for_old_packages);
        assert!(!result.valid_for_new_packages);
    }

    #[test]
    fn test_too_long_is_a_warning() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        let result = validate_package_name(&name);
        assert!(result.errors.is_empty());
        assert_eq!(
            result.warnings,
            vec!["name can no longer contain more than 214 characters".to_string()]
        );
    }

    #[test]
    fn test_invalid_name_reports_everything() {
        let result = validate_package_name("Invalid Name!");
        assert_eq!(
            result.errors,
            vec!["name can only contain URL-friendly characters".to_string()]
        );
        assert_eq!(
            result.warnings,
            vec![
                "name can no longer contain capital letters".to_string(),
                r#"name can no longer contain special characters ("~'!()*")"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_split_scope() {
        assert_eq!(split_scope("@acme/widgets"), Some(("acme", "widgets")));
        assert_eq!(split_scope("widgets"), None);
        assert_eq!(split_scope("a/b/c"), None);
    }

    proptest! {
        #[test]
        fn lowercase_slugs_are_valid(name in "[a-z][a-z0-9-]{0,40}") {
            prop_assume!(!CORE_MODULES.contains(&name.as_str()));
            let result = validate_package_name(&name);
            prop_assert!(result.valid_for_new_packages, "{:?}", result);
        }

        #[test]
        fn capital_letters_are_never_valid_for_new_packages(
            prefix in "[a-z]{0,10}",
            upper in "[A-Z]",
            suffix in "[a-z0-9-]{0,10}",
        ) {
            let name = format!("{prefix}{upper}{suffix}");
            let result = validate_package_name(&name);
            prop_assert!(!result.valid_for_new_packages);
        }

        #[test]
        fn whitespace_is_an_error(left in "[a-z]{1,10}", right in "[a-z]{1,10}") {
            let name = format!("{left} {right}");
            let result = validate_package_name(&name);
            prop_assert!(!result.valid_for_old_packages);
        }
    }
}
