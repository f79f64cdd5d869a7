//! Barcode classifier
//!
//! Maps a scanned or typed token to the entity it identifies. Classification
//! is total: a token that matches no rule comes back as [`EntityKind::Unknown`]
//! with the raw token as identifier, so a misread code never blocks a scan.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Entity a barcode refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Item,
    Borrowing,
    User,
    Unknown,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EntityKind::Item => "item",
            EntityKind::Borrowing => "borrowing",
            EntityKind::User => "user",
            EntityKind::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Result of classifying a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassifiedReference {
    /// Identifier with the structural prefix stripped
    pub identifier: String,
    pub kind: EntityKind,
}

impl ClassifiedReference {
    pub fn new(identifier: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }

    pub fn unknown(token: impl Into<String>) -> Self {
        Self::new(token, EntityKind::Unknown)
    }
}

/// A single prefix rule, as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Reserved prefix, compared ASCII case-insensitively
    pub prefix: String,
    pub kind: EntityKind,
    /// Optional regex the remainder must match in full
    #[serde(default)]
    pub pattern: Option<String>,
}

impl ClassificationRule {
    pub fn new(prefix: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            prefix: prefix.into(),
            kind,
            pattern: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// How overlapping rules are ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePriority {
    /// Longest prefix first; equal lengths keep their configured order
    #[default]
    LongestPrefix,
    /// Configured order, first match wins
    Declared,
}

/// Rule set errors, raised when the classifier is built
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("rule #{index} has an empty prefix")]
    EmptyPrefix { index: usize },

    #[error("rule '{prefix}' cannot target the unknown kind")]
    UnknownTarget { prefix: String },

    #[error("rule '{prefix}' has an invalid pattern: {source}")]
    InvalidPattern {
        prefix: String,
        #[source]
        source: regex::Error,
    },
}

/// Built-in prefixes used when configuration provides none
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule::new("ITEM-", EntityKind::Item),
        ClassificationRule::new("BORROW-", EntityKind::Borrowing),
        ClassificationRule::new("USER-", EntityKind::User),
    ]
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: ClassificationRule,
    pattern: Option<Regex>,
}

impl CompiledRule {
    /// Remainder of `token` after this rule's prefix, if the rule accepts it
    fn accept<'t>(&self, token: &'t str) -> Option<&'t str> {
        let prefix = &self.rule.prefix;
        let head = token.get(..prefix.len())?;
        if !head.eq_ignore_ascii_case(prefix) {
            return None;
        }
        let rest = token.get(prefix.len()..)?;
        if rest.is_empty() {
            return None;
        }
        match &self.pattern {
            Some(pattern) if !pattern.is_match(rest) => None,
            _ => Some(rest),
        }
    }
}

/// Ordered prefix rules
///
/// By default rules are evaluated longest prefix first so the most specific
/// one wins; prefixes of equal length keep their configured order.
#[derive(Debug, Clone)]
pub struct BarcodeClassifier {
    rules: Vec<CompiledRule>,
    priority: RulePriority,
}

impl BarcodeClassifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Result<Self, ClassifierError> {
        Self::with_priority(rules, RulePriority::default())
    }

    pub fn with_priority(
        rules: Vec<ClassificationRule>,
        priority: RulePriority,
    ) -> Result<Self, ClassifierError> {
        let mut compiled = Vec::with_capacity(rules.len());

        for (index, rule) in rules.into_iter().enumerate() {
            if rule.prefix.is_empty() {
                return Err(ClassifierError::EmptyPrefix { index });
            }
            if rule.kind == EntityKind::Unknown {
                return Err(ClassifierError::UnknownTarget { prefix: rule.prefix });
            }
            let pattern = match &rule.pattern {
                Some(source) => Some(Regex::new(&format!("^(?:{})$", source)).map_err(
                    |source| ClassifierError::InvalidPattern {
                        prefix: rule.prefix.clone(),
                        source,
                    },
                )?),
                None => None,
            };
            compiled.push(CompiledRule { rule, pattern });
        }

        Ok(Self::from_compiled(compiled, priority))
    }

    fn from_compiled(mut rules: Vec<CompiledRule>, priority: RulePriority) -> Self {
        if priority == RulePriority::LongestPrefix {
            // stable: equal lengths stay in configured order
            rules.sort_by(|a, b| b.rule.prefix.len().cmp(&a.rule.prefix.len()));
        }
        Self { rules, priority }
    }

    pub fn priority(&self) -> RulePriority {
        self.priority
    }

    /// Classify a token. Never fails.
    pub fn classify(&self, token: &str) -> ClassifiedReference {
        self.rules
            .iter()
            .find_map(|rule| {
                rule.accept(token)
                    .map(|rest| ClassifiedReference::new(rest, rule.rule.kind))
            })
            .unwrap_or_else(|| ClassifiedReference::unknown(token))
    }

    /// Build the canonical token for `identifier` of the given kind.
    ///
    /// Returns `None` when no rule targets `kind`, or when the resulting
    /// token would not classify back to the same reference.
    pub fn encode(&self, identifier: &str, kind: EntityKind) -> Option<String> {
        let rule = self.rules.iter().find(|rule| rule.rule.kind == kind)?;
        let token = format!("{}{}", rule.rule.prefix, identifier);
        let expected = ClassifiedReference::new(identifier, kind);
        (self.classify(&token) == expected).then_some(token)
    }

    /// Rules in effective priority order
    pub fn rules(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.rules.iter().map(|rule| &rule.rule)
    }
}

impl Default for BarcodeClassifier {
    fn default() -> Self {
        Self::from_compiled(
            default_rules()
                .into_iter()
                .map(|rule| CompiledRule { rule, pattern: None })
                .collect(),
            RulePriority::default(),
        )
    }
}
