//! `{{variable}}` substitution applied to requests before transport.

use std::collections::HashMap;
use std::ops::Range;

use chrono::Utc;
use meridian_application::ports::{RequestProcessor, TransportError};
use meridian_domain::{RequestData, generate_id};

/// A `{{name}}` occurrence in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without braces, trimmed).
    pub name: String,

    /// Byte range of the whole reference, braces included.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Returns true for built-in names (`$uuid`, `$timestamp`, ...).
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.name.starts_with('$')
    }
}

/// Extracts every `{{name}}` reference from `input`.
///
/// Empty references and an unterminated trailing `{{` are ignored.
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch != '{' || !matches!(chars.peek(), Some((_, '{'))) {
            continue;
        }
        chars.next();

        let mut name = String::new();
        let mut closed = false;
        while let Some((_, ch)) = chars.next() {
            if ch == '}'
                && let Some(&(end, '}')) = chars.peek()
            {
                chars.next();
                let trimmed = name.trim();
                if !trimmed.is_empty() {
                    references.push(VariableReference {
                        name: trimmed.to_string(),
                        span: start..end + 1,
                    });
                }
                closed = true;
                break;
            }
            name.push(ch);
        }

        if !closed {
            break;
        }
    }

    references
}

/// Substitutes `{{name}}` in the URL, headers and payload of a request.
///
/// User variables come from the processor's map. Built-ins:
/// - `$uuid`: a fresh id, stable within one request
/// - `$timestamp`: Unix seconds
/// - `$isoTimestamp`: RFC 3339 time
///
/// Unknown variables are left in place.
#[derive(Debug, Clone, Default)]
pub struct VariableProcessor {
    variables: HashMap<String, String>,
}

impl VariableProcessor {
    /// Creates a processor with the given variables.
    #[must_use]
    pub const fn new(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Adds or replaces a variable.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Substitutes variables in `input`. Built-in values are cached in
    /// `builtins` so repeated references agree.
    fn substitute(&self, input: &str, builtins: &mut HashMap<String, String>) -> String {
        let references = parse_variables(input);
        if references.is_empty() {
            return input.to_string();
        }

        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;
        for reference in &references {
            result.push_str(&input[last_end..reference.span.start]);
            match self.value_of(reference, builtins) {
                Some(value) => result.push_str(&value),
                None => {
                    tracing::debug!(name = %reference.name, "Unresolved variable");
                    result.push_str(&input[reference.span.clone()]);
                }
            }
            last_end = reference.span.end;
        }
        result.push_str(&input[last_end..]);
        result
    }

    fn value_of(
        &self,
        reference: &VariableReference,
        builtins: &mut HashMap<String, String>,
    ) -> Option<String> {
        if !reference.is_builtin() {
            return self.variables.get(&reference.name).cloned();
        }
        if let Some(cached) = builtins.get(&reference.name) {
            return Some(cached.clone());
        }
        let value = match reference.name.as_str() {
            "$uuid" => generate_id(),
            "$timestamp" => Utc::now().timestamp().to_string(),
            "$isoTimestamp" => Utc::now().to_rfc3339(),
            _ => return None,
        };
        builtins.insert(reference.name.clone(), value.clone());
        Some(value)
    }
}

impl RequestProcessor for VariableProcessor {
    async fn process(&self, mut request: RequestData) -> Result<RequestData, TransportError> {
        let mut builtins = HashMap::new();
        request.url = self.substitute(&request.url, &mut builtins);
        request.headers = request
            .headers
            .map(|headers| self.substitute(&headers, &mut builtins));
        request.payload = request
            .payload
            .map(|payload| self.substitute(&payload, &mut builtins));
        Ok(request)
    }
}
