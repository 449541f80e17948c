//! Name mangling rules shared by the binding generator.
//!
//! YANG identifiers map onto Java identifiers through a handful of simple
//! transformations: camel-casing for classes and methods, dotted lower-case
//! segments for packages, and a lossless `$xx` escape for the last-resort
//! naming strategy.

/// Reserved Java words which cannot appear as identifiers or package segments.
pub const JAVA_RESERVED_WORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
    "_",
];

/// Default prefix of every generated module package.
pub const DEFAULT_PACKAGE_PREFIX: &str = "org.opendaylight.yang.gen.v1";

/// Suffix of the module data root class.
pub const DATA_ROOT_SUFFIX: &str = "Data";

/// Suffix of list key classes.
pub const KEY_SUFFIX: &str = "Key";

/// Suffix of operation input classes.
pub const INPUT_SUFFIX: &str = "Input";

/// Suffix of operation output classes.
pub const OUTPUT_SUFFIX: &str = "Output";

/// Returns true if `word` is a reserved Java word.
#[must_use]
pub fn is_reserved_word(word: &str) -> bool {
    JAVA_RESERVED_WORDS.contains(&word)
}

/// Converts a YANG identifier to an upper camel-case class name.
///
/// `-`, `_` and `.` are dropped and the following character is capitalized.
#[must_use]
pub fn class_name(identifier: &str) -> String {
    let mut result = String::with_capacity(identifier.len());
    let mut capitalize_next = true;

    for c in identifier.chars() {
        if matches!(c, '-' | '_' | '.') {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Converts a YANG identifier to a lower camel-case property name.
///
/// Reserved words are prefixed with `_`.
#[must_use]
pub fn property_name(identifier: &str) -> String {
    let camel = class_name(identifier);
    let mut chars = camel.chars();
    let name = match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => String::new(),
    };
    if is_reserved_word(&name) {
        format!("_{name}")
    } else {
        name
    }
}

/// Returns the getter method name for a schema child.
#[must_use]
pub fn getter_name(identifier: &str) -> String {
    format!("get{}", class_name(identifier))
}

/// Returns the `require` accessor name for a leaf.
#[must_use]
pub fn require_name(identifier: &str) -> String {
    format!("require{}", class_name(identifier))
}

/// Returns the `nonnull` accessor name for a container or list.
#[must_use]
pub fn nonnull_name(identifier: &str) -> String {
    format!("nonnull{}", class_name(identifier))
}

/// Returns the notification listener callback name.
#[must_use]
pub fn listener_method_name(identifier: &str) -> String {
    format!("on{}", class_name(identifier))
}

/// Returns the raw package string of an identifier: `-` becomes `.`.
#[must_use]
pub fn package_string(identifier: &str) -> String {
    identifier.replace('-', ".")
}

/// Normalizes a dotted package name.
///
/// Every segment is lower-cased; segments which are reserved words or start
/// with a digit are prefixed with `_`. Empty segments are dropped.
#[must_use]
pub fn normalize_package_name(package: &str) -> String {
    let mut result = String::with_capacity(package.len() + 4);
    for segment in package.split('.').filter(|s| !s.is_empty()) {
        if !result.is_empty() {
            result.push('.');
        }
        let lower = segment.to_ascii_lowercase();
        let starts_with_digit = lower.chars().next().is_some_and(|c| c.is_ascii_digit());
        if starts_with_digit || is_reserved_word(&lower) {
            result.push('_');
        }
        result.push_str(&lower);
    }
    result
}

/// Escapes an identifier losslessly into a valid Java identifier.
///
/// ASCII letters, digits and `_` are kept. Any other ASCII character becomes
/// `$` followed by its two-digit lower-case hexadecimal code; non-ASCII
/// characters become `$u` followed by six hexadecimal digits.
#[must_use]
pub fn escape_identifier(identifier: &str) -> String {
    let mut result = String::with_capacity(identifier.len() + 8);
    for c in identifier.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        } else if c.is_ascii() {
            result.push_str(&format!("${:02x}", u32::from(c)));
        } else {
            result.push_str(&format!("$u{:06x}", u32::from(c)));
        }
    }
    result
}

/// Computes the root package of a module.
///
/// The namespace is mapped onto dots, then the revision is appended as
/// `revYYMMDD`, or `norev` for unrevisioned modules.
#[must_use]
pub fn root_package_name(prefix: &str, namespace: &str, revision: Option<&str>) -> String {
    let mapped: String = namespace
        .replace("://", ".")
        .chars()
        .map(|c| match c {
            '/' | ':' | '-' | '@' | '$' | '#' | '\'' | '*' | '+' | ',' | ';' | '=' => '.',
            other => other,
        })
        .collect();

    let suffix = match revision {
        Some(revision) => {
            let digits: String = revision.chars().filter(char::is_ascii_digit).collect();
            format!("rev{}", digits.get(2..).unwrap_or(&digits))
        }
        None => "norev".to_string(),
    };

    normalize_package_name(&format!("{prefix}.{mapped}.{suffix}"))
}
