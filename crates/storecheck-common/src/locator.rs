//! Locators and locator sets.
//!
//! A [`Locator`] is one way of finding elements in a document. A [`LocatorSet`]
//! is an ordered list of alternative locators for a single logical target
//! ("the search box", "a product card"). Earlier entries are the most specific
//! and are always preferred over later, broader ones.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a locator expression is interpreted by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// CSS selector (`button.add-to-cart`)
    Css,
    /// XPath expression (`//a[contains(@href,'cart')]`)
    Xpath,
    /// Attribute match written as `name=value`, or a bare `name` for presence
    Attribute,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Css => "css",
            Strategy::Xpath => "xpath",
            Strategy::Attribute => "attribute",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `(strategy, expression)` pair. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    expression: String,
}

impl Locator {
    pub fn new(strategy: Strategy, expression: impl Into<String>) -> Self {
        Self {
            strategy,
            expression: expression.into(),
        }
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(Strategy::Xpath, expression)
    }

    /// Match elements whose attribute `name` equals `value`.
    pub fn attribute(name: &str, value: &str) -> Self {
        Self::new(Strategy::Attribute, format!("{}={}", name, value))
    }

    /// Match elements carrying attribute `name`, whatever its value.
    pub fn attribute_present(name: &str) -> Self {
        Self::new(Strategy::Attribute, name)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Split an attribute expression into its name and optional value.
    ///
    /// Returns `None` for non-attribute locators or an empty attribute name.
    pub fn attribute_parts(&self) -> Option<(&str, Option<&str>)> {
        if self.strategy != Strategy::Attribute {
            return None;
        }
        let (name, value) = match self.expression.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (self.expression.trim(), None),
        };
        if name.is_empty() {
            return None;
        }
        Some((name, value))
    }

    /// Attribute locators expressed as an equivalent CSS attribute selector.
    pub fn attribute_as_css(&self) -> Option<String> {
        let (name, value) = self.attribute_parts()?;
        Some(match value {
            Some(value) => {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                format!("[{}=\"{}\"]", name, escaped)
            }
            None => format!("[{}]", name),
        })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.strategy, self.expression)
    }
}

/// Ordered fallback alternatives for one logical target.
///
/// Sets are plain data: they are declared where they are used, carry no state
/// between resolutions and can be shared freely. Callers always supply at least
/// one locator; an empty set simply never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorSet {
    name: String,
    locators: Vec<Locator>,
}

impl LocatorSet {
    pub fn new(name: impl Into<String>, locators: Vec<Locator>) -> Self {
        Self {
            name: name.into(),
            locators,
        }
    }

    /// Start an empty set to be filled with the chaining helpers below.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn css(self, selector: impl Into<String>) -> Self {
        self.with(Locator::css(selector))
    }

    pub fn xpath(self, expression: impl Into<String>) -> Self {
        self.with(Locator::xpath(expression))
    }

    pub fn attribute(self, name: &str, value: &str) -> Self {
        self.with(Locator::attribute(name, value))
    }

    pub fn with(mut self, locator: Locator) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locator> {
        self.locators.iter()
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl fmt::Display for LocatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} locators)", self.name, self.locators.len())
    }
}
