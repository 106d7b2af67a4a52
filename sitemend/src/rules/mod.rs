//! The rule catalog: concrete [`crate::engine::Rule`] implementations,
//! grouped by document type. HTML, CSS, and script rules are disjoint
//! sets; callers build an ordered [`crate::engine::RuleSet`] per document
//! type.

/// Module containing stylesheet minification rules.
pub mod css;
/// Module containing HTML fix-up rules.
pub mod html;
/// Module containing script minification rules.
pub mod js;
