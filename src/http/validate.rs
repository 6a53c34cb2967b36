//! Response validation
//!
//! Likee endpoints report errors inside a 200 response. Two conventions are
//! in use across endpoint families and neither is documented, so both checks
//! run on every body.

use crate::error::{Error, Result};
use crate::types::{value_to_text, JsonObject};
use tracing::warn;

/// One "field must equal token" success rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessRule {
    /// Body field carrying the status
    pub field: String,
    /// Value meaning success
    pub token: String,
}

impl SuccessRule {
    /// Create a rule
    pub fn new(field: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            token: token.into(),
        }
    }
}

/// Checks decoded bodies for platform error signals
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    rules: Vec<SuccessRule>,
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self {
            rules: vec![
                SuccessRule::new("message", "ok"),
                SuccessRule::new("msg", "success"),
            ],
        }
    }
}

impl ResponseValidator {
    /// Validator with the `message == "ok"` and `msg == "success"` rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with custom rules
    pub fn with_rules(rules: Vec<SuccessRule>) -> Self {
        Self { rules }
    }

    /// Configured rules
    pub fn rules(&self) -> &[SuccessRule] {
        &self.rules
    }

    /// Return the field that signals an error, if any.
    ///
    /// A body carrying none of the rule fields passes.
    pub fn failure<'a>(&'a self, body: &JsonObject) -> Option<&'a SuccessRule> {
        self.rules.iter().find(|rule| {
            body.get(&rule.field)
                .is_some_and(|value| value != rule.token.as_str())
        })
    }

    /// Whether a body is a success
    pub fn is_success(&self, body: &JsonObject) -> bool {
        self.failure(body).is_none()
    }

    /// Fail with the offending field and value
    pub fn check(&self, body: &JsonObject) -> Result<()> {
        match self.failure(body) {
            Some(rule) => {
                let value = body.get(&rule.field).map(value_to_text).unwrap_or_default();
                Err(Error::validation(format!("{} = {:?}", rule.field, value)))
            }
            None => Ok(()),
        }
    }

    /// Pass a successful body through unchanged; turn a failed one into an
    /// empty object.
    pub fn validate(&self, body: JsonObject) -> JsonObject {
        match self.check(&body) {
            Ok(()) => body,
            Err(e) => {
                warn!("{}", e);
                JsonObject::new()
            }
        }
    }
}
