//! Element locator strategies.
//!
//! Provides Selenium-like `By` locators for finding elements. A locator is a
//! (strategy, value) pair; beyond equality and formatting the orchestration
//! layer treats it as opaque and hands it to the browser capability as-is.
//!
//! # Example
//!
//! ```ignore
//! use smart_webdriver::By;
//!
//! // CSS selector (default)
//! session.click(&By::css("#submit")).await?;
//!
//! // By ID
//! session.type_text(&By::id("username"), "admin").await?;
//!
//! // By XPath
//! session.click(&By::xpath("//button[@type='submit']")).await?;
//!
//! // Plain strings convert to CSS selectors
//! let by: By = "#submit".into();
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// By Enum
// ============================================================================

/// Element locator strategy (like Selenium's `By`).
///
/// Supports multiple strategies for finding elements in the DOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// CSS selector (most common).
    ///
    /// # Example
    /// ```ignore
    /// By::css("#login-button")
    /// By::css("button.primary")
    /// By::css("[data-testid='submit']")
    /// ```
    #[serde(rename = "css")]
    Css(String),

    /// XPath expression.
    ///
    /// # Example
    /// ```ignore
    /// By::xpath("//button[@type='submit']")
    /// By::xpath("//div[contains(@class, 'modal')]")
    /// ```
    #[serde(rename = "xpath")]
    XPath(String),

    /// Element ID (shorthand for `#id` CSS selector).
    ///
    /// # Example
    /// ```ignore
    /// By::id("username")  // equivalent to By::css("#username")
    /// ```
    #[serde(rename = "id")]
    Id(String),

    /// Name attribute.
    ///
    /// # Example
    /// ```ignore
    /// By::name("email")  // equivalent to By::css("[name='email']")
    /// ```
    #[serde(rename = "name")]
    Name(String),

    /// Tag name.
    ///
    /// # Example
    /// ```ignore
    /// By::tag("button")
    /// By::tag("input")
    /// ```
    #[serde(rename = "tag")]
    Tag(String),

    /// Class name (single class).
    ///
    /// # Example
    /// ```ignore
    /// By::class("btn-primary")  // equivalent to By::css(".btn-primary")
    /// ```
    #[serde(rename = "class")]
    Class(String),

    /// Link text (for `<a>` elements).
    ///
    /// # Example
    /// ```ignore
    /// By::link_text("Home")
    /// ```
    #[serde(rename = "linkText")]
    LinkText(String),

    /// Partial link text (for `<a>` elements).
    ///
    /// # Example
    /// ```ignore
    /// By::partial_link_text("Read more")
    /// ```
    #[serde(rename = "partialLinkText")]
    PartialLinkText(String),
}

impl By {
    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Creates an ID selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Creates a name attribute selector.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Creates a tag name selector.
    #[inline]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    /// Creates a class name selector.
    #[inline]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Creates a link text selector.
    #[inline]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::LinkText(text.into())
    }

    /// Creates a partial link text selector.
    #[inline]
    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::PartialLinkText(text.into())
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::Tag(_) => "tag",
            Self::Class(_) => "class",
            Self::LinkText(_) => "linkText",
            Self::PartialLinkText(_) => "partialLinkText",
        }
    }

    /// Returns the locator value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v)
            | Self::XPath(v)
            | Self::Id(v)
            | Self::Name(v)
            | Self::Tag(v)
            | Self::Class(v)
            | Self::LinkText(v)
            | Self::PartialLinkText(v) => v,
        }
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Display for By {
    /// Formats as `strategy:value`, e.g. `css:#login`.
    ///
    /// Used in log events, failure messages and artifact names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy(), self.value())
    }
}

// ============================================================================
// From implementations for ergonomics
// ============================================================================

impl From<&str> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: &str) -> Self {
        Self::Css(s.to_string())
    }
}

impl From<String> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: String) -> Self {
        Self::Css(s)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_css() {
        let by = By::css("#login");
        assert_eq!(by.strategy(), "css");
        assert_eq!(by.value(), "#login");
    }

    #[test]
    fn test_by_id() {
        let by = By::id("username");
        assert_eq!(by.strategy(), "id");
        assert_eq!(by.value(), "username");
    }

    #[test]
    fn test_by_xpath() {
        let by = By::xpath("//button");
        assert_eq!(by.strategy(), "xpath");
        assert_eq!(by.value(), "//button");
    }

    #[test]
    fn test_display() {
        assert_eq!(By::css("#login").to_string(), "css:#login");
        assert_eq!(By::link_text("Home").to_string(), "linkText:Home");
    }

    #[test]
    fn test_from_str() {
        let by: By = "#login".into();
        assert!(matches!(by, By::Css(_)));
    }

    #[test]
    fn test_builder_methods() {
        assert!(matches!(By::css("#id"), By::Css(_)));
        assert!(matches!(By::xpath("//div"), By::XPath(_)));
        assert!(matches!(By::name("email"), By::Name(_)));
        assert!(matches!(By::id("myid"), By::Id(_)));
    }

    #[test]
    fn test_serde_shape() {
        let by = By::css("#login");
        let json = serde_json::to_value(&by).unwrap();
        assert_eq!(json["strategy"], "css");
        assert_eq!(json["value"], "#login");

        let back: By = serde_json::from_value(json).unwrap();
        assert_eq!(back, by);
    }

    #[test]
    fn test_equality() {
        assert_eq!(By::css("#a"), By::from("#a"));
        assert_ne!(By::css("#a"), By::id("a"));
    }
}
