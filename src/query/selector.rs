// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Label selector parsing and matching
//!
//! ## Syntax
//!
//! A selector is a comma-separated list of `key<op>value` clauses, all of
//! which must hold (logical AND):
//!
//! - `key==value` and `key=value` require the label to equal `value`
//! - `key!=value` requires the label to differ; a missing label differs
//!
//! Operators are detected in the order `==`, `!=`, `=` so that the `=` inside
//! `!=` is never mistaken for a bare equality.
//!
//! ## Unlabeled resources
//!
//! A resource without any label map matches every selector, so unlabeled
//! objects stay visible whatever `-l` says.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{GetError, Result};

/// Selector operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorOperator {
    /// `==` or `=`
    Equals,
    /// `!=`
    NotEquals,
}

impl SelectorOperator {
    /// Detection order matters: `!=` must win over a bare `=` scan
    const TOKENS: [(&'static str, SelectorOperator); 3] = [
        ("==", SelectorOperator::Equals),
        ("!=", SelectorOperator::NotEquals),
        ("=", SelectorOperator::Equals),
    ];
}

/// One `key<op>value` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorClause {
    pub key: String,
    pub value: String,
    pub operator: SelectorOperator,
}

impl SelectorClause {
    pub fn match_if_equal(&self) -> bool {
        self.operator == SelectorOperator::Equals
    }

    /// Evaluate against a label map
    pub fn matches(&self, labels: &Map<String, Value>) -> bool {
        let actual = labels.get(&self.key).and_then(Value::as_str);
        let equal = actual == Some(self.value.as_str());
        equal == self.match_if_equal()
    }
}

impl fmt::Display for SelectorClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            SelectorOperator::Equals => write!(f, "{}={}", self.key, self.value),
            SelectorOperator::NotEquals => write!(f, "{}!={}", self.key, self.value),
        }
    }
}

/// A parsed selector expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    clauses: Vec<SelectorClause>,
}

impl LabelSelector {
    /// Parse a selector expression.
    ///
    /// An empty or whitespace-only expression selects everything. Every
    /// comma-separated token must yield exactly one clause.
    pub fn parse(expr: &str) -> Result<Self> {
        if expr.trim().is_empty() {
            return Ok(Self::default());
        }

        let clauses = expr
            .split(',')
            .map(parse_clause)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { clauses })
    }

    #[cfg(test)]
    pub fn clauses(&self) -> &[SelectorClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when every clause holds, or when there are no labels at all
    pub fn matches(&self, labels: Option<&Map<String, Value>>) -> bool {
        match labels {
            Some(labels) => self.clauses.iter().all(|c| c.matches(labels)),
            None => true,
        }
    }
}

fn parse_clause(token: &str) -> Result<SelectorClause> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(GetError::bad_selector(token, "empty clause"));
    }

    let (op, operator) = SelectorOperator::TOKENS
        .into_iter()
        .find(|(op, _)| trimmed.contains(op))
        .ok_or_else(|| {
            GetError::bad_selector(token, "expected one of \"==\", \"!=\" or \"=\"")
        })?;

    let sides: Vec<&str> = trimmed.split(op).collect();
    if sides.len() != 2 {
        return Err(GetError::bad_selector(
            token,
            format!("may not contain more than one {:?}", op),
        ));
    }

    let (key, value) = (sides[0].trim(), sides[1].trim());
    if key.is_empty() || value.is_empty() {
        return Err(GetError::bad_selector(token, "key and value must both be set"));
    }

    Ok(SelectorClause {
        key: key.to_string(),
        value: value.to_string(),
        operator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn labels(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_operators() {
        let selector = LabelSelector::parse("a==1,b!=2,c=3").unwrap();
        let clauses = selector.clauses();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].operator, SelectorOperator::Equals);
        assert_eq!(clauses[1].operator, SelectorOperator::NotEquals);
        assert_eq!(clauses[1].key, "b");
        assert_eq!(clauses[1].value, "2");
        assert!(clauses[2].match_if_equal());
    }

    #[test]
    fn test_clause_to_string() {
        let selector = LabelSelector::parse("tier!=frontend,env==prod").unwrap();
        let rendered: Vec<String> = selector.clauses().iter().map(|c| c.to_string()).collect();
        assert_eq!(rendered, vec!["tier!=frontend", "env=prod"]);
    }

    #[test]
    fn test_parse_empty_selects_everything() {
        assert!(LabelSelector::parse("").unwrap().is_empty());
        assert!(LabelSelector::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["app", "a=b=c", "a==b==c", "=b", "a!=", "a=b,", "a=b,,c=d"] {
            assert!(
                matches!(LabelSelector::parse(bad), Err(GetError::BadSelectorSyntax { .. })),
                "selector {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_equality_clause() {
        let selector = LabelSelector::parse("k==v").unwrap();
        assert!(selector.matches(Some(&labels(json!({"k": "v"})))));
        assert!(!selector.matches(Some(&labels(json!({"k": "w"})))));
    }

    #[test]
    fn test_inequality_clause() {
        let selector = LabelSelector::parse("k!=v").unwrap();
        assert!(!selector.matches(Some(&labels(json!({"k": "v"})))));
        assert!(selector.matches(Some(&labels(json!({"k": "w"})))));
        // A missing label counts as different
        assert!(selector.matches(Some(&labels(json!({"other": "v"})))));
    }

    #[test]
    fn test_unlabeled_resource_matches_anything() {
        let selector = LabelSelector::parse("env=prod,tier!=frontend").unwrap();
        assert!(selector.matches(None));
    }

    #[test]
    fn test_combined_selector() {
        let selector = LabelSelector::parse("env=prod,tier!=frontend").unwrap();
        assert!(selector.matches(Some(&labels(json!({"env": "prod", "tier": "backend"})))));
        assert!(!selector.matches(Some(&labels(json!({"env": "prod", "tier": "frontend"})))));
        assert!(!selector.matches(Some(&labels(json!({"env": "dev", "tier": "backend"})))));
    }
}
