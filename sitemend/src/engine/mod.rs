//! Rule-based text-rewriting engine.
//!
//! The engine owns an ordered list of rules and applies them in sequence to
//! a document. Each rule sees the output of the rules before it, never the
//! original text. A rule that finds nothing to do (or cannot make sense of
//! the markup around its target) reports [`Outcome::Unchanged`] and the run
//! moves on; a single rule can never abort the pipeline.
//!
//! Two guarantees hold for every shipped rule set:
//!
//! * **Determinism** — the same input text always yields the same output
//!   text and the same change log.
//! * **Idempotence** — running the engine over its own output yields the
//!   input back with an empty change log.

pub mod edits;

use serde::Serialize;

/// Result of applying a single rule to the current document text.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The rule found nothing applicable. Covers both "no match" and
    /// "matcher could not parse the surrounding structure".
    Unchanged,
    /// The rule rewrote the document.
    Changed {
        /// The full replacement text.
        text: String,
        /// Human-readable descriptions, one per logical change.
        descriptions: Vec<String>,
    },
}

impl Outcome {
    /// Build a [`Outcome::Changed`] with a single description.
    #[must_use]
    pub fn changed(text: String, description: impl Into<String>) -> Self {
        Self::Changed {
            text,
            descriptions: vec![description.into()],
        }
    }
}

/// A named unit of transformation.
///
/// Implementations must be safe to run any number of times: applying a rule
/// to text it has already transformed must report [`Outcome::Unchanged`].
pub trait Rule: Send + Sync {
    /// Identifier used in the change log and diagnostics.
    fn name(&self) -> &'static str;

    /// Evaluate the rule against the current document text.
    fn apply(&self, text: &str) -> Outcome;
}

/// An ordered sequence of rules, applied first to last.
pub type RuleSet = Vec<Box<dyn Rule>>;

/// One entry of the change log.
#[derive(Debug, Clone, Serialize)]
pub struct Change {
    /// Name of the rule that made the change.
    pub rule: &'static str,
    /// What the rule did.
    pub description: String,
}

/// Final text plus the full change log of one engine run.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteReport {
    /// Document text after the last rule.
    pub text: String,
    /// Changes in rule-application order. Empty when nothing matched.
    pub changes: Vec<Change>,
}

impl RewriteReport {
    /// Whether the run left the document untouched.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Applies an ordered [`RuleSet`] to documents.
///
/// The engine holds no per-document state: `run` is a pure function of the
/// input text, so one engine can be shared across threads, one document per
/// worker.
pub struct RewriteEngine {
    rules: RuleSet,
}

impl RewriteEngine {
    /// Create an engine over the given rules. An empty rule set is valid
    /// and makes `run` the identity transform.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Names of the configured rules, in application order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Apply every rule in order to `document` and collect the change log.
    #[must_use]
    pub fn run(&self, document: &str) -> RewriteReport {
        let mut text = document.to_owned();
        let mut changes = Vec::new();

        for rule in &self.rules {
            if let Outcome::Changed {
                text: rewritten,
                descriptions,
            } = rule.apply(&text)
            {
                if rewritten != text {
                    text = rewritten;
                    changes.extend(descriptions.into_iter().map(|description| Change {
                        rule: rule.name(),
                        description,
                    }));
                }
            }
        }

        RewriteReport { text, changes }
    }
}
