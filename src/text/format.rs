//! # Value Formatting
//!
//! Turns a [`TextValue`] into display text. Formatters are plain trait
//! objects; a [`FormatterRegistry`] maps a [`TextKind`] tag to one and is
//! owned by the caller, so every document can carry its own conventions.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// The raw value a text node displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TextValue {
    #[default]
    Empty,
    Str(String),
    Int(i64),
    Real(f64),
    Bool(bool),
}

impl TextValue {
    /// Numeric view of the value. Strings are parsed after trimming.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TextValue::Int(v) => Some(*v as f64),
            TextValue::Real(v) => Some(*v),
            TextValue::Str(s) => s.trim().parse::<f64>().ok(),
            TextValue::Empty | TextValue::Bool(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TextValue::Empty)
    }
}

impl fmt::Display for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextValue::Empty => Ok(()),
            TextValue::Str(s) => f.write_str(s),
            TextValue::Int(v) => write!(f, "{}", v),
            TextValue::Real(v) => write!(f, "{}", v),
            TextValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for TextValue {
    fn from(s: &str) -> Self {
        TextValue::Str(s.to_string())
    }
}

impl From<String> for TextValue {
    fn from(s: String) -> Self {
        TextValue::Str(s)
    }
}

impl From<i64> for TextValue {
    fn from(v: i64) -> Self {
        TextValue::Int(v)
    }
}

impl From<i32> for TextValue {
    fn from(v: i32) -> Self {
        TextValue::Int(v as i64)
    }
}

impl From<f64> for TextValue {
    fn from(v: f64) -> Self {
        TextValue::Real(v)
    }
}

impl From<bool> for TextValue {
    fn from(v: bool) -> Self {
        TextValue::Bool(v)
    }
}

impl<T: Into<TextValue>> From<Option<T>> for TextValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(TextValue::Empty)
    }
}

/// Converts a value to display text.
pub trait TextFormatter {
    fn format(&self, value: &TextValue) -> String;
}

impl<F> TextFormatter for F
where
    F: Fn(&TextValue) -> String,
{
    fn format(&self, value: &TextValue) -> String {
        self(value)
    }
}

/// Wraps negative numbers in parentheses; `#` stands for the formatted number.
pub const NEGATIVE_PARENTHESES: &str = "(#)";

/// Fixed-precision number formatting with locale separators.
#[derive(Clone, Default)]
pub struct NumericFormatter {
    pub prefix: String,
    pub suffix: String,
    /// Replaces `.`; empty keeps it.
    pub decimal_separator: String,
    /// Inserted every three integer digits; empty disables grouping.
    pub thousands_separator: String,
    pub precision: usize,
    /// Applied to the parsed number before formatting.
    pub transform: Option<Rc<dyn Fn(f64) -> f64>>,
    /// Pattern for negative values; `#` is replaced with the number.
    pub negative_format: String,
    pub hide_sign: bool,
}

impl fmt::Debug for NumericFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericFormatter")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("decimal_separator", &self.decimal_separator)
            .field("thousands_separator", &self.thousands_separator)
            .field("precision", &self.precision)
            .field("transform", &self.transform.is_some())
            .field("negative_format", &self.negative_format)
            .field("hide_sign", &self.hide_sign)
            .finish()
    }
}

impl NumericFormatter {
    pub fn new(precision: usize) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_separators(mut self, decimal: impl Into<String>, thousands: impl Into<String>) -> Self {
        self.decimal_separator = decimal.into();
        self.thousands_separator = thousands.into();
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_negative_format(mut self, format: impl Into<String>) -> Self {
        self.negative_format = format.into();
        self
    }

    pub fn with_hide_sign(mut self, hide: bool) -> Self {
        self.hide_sign = hide;
        self
    }

    pub fn with_transform(mut self, transform: impl Fn(f64) -> f64 + 'static) -> Self {
        self.transform = Some(Rc::new(transform));
        self
    }

    fn format_number(&self, mut number: f64) -> String {
        if let Some(transform) = &self.transform {
            number = transform(number);
        }
        let negative = number < 0.0;
        let digits = format!("{:.*}", self.precision, number.abs());
        let (integer, fraction) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };

        let mut body = group_thousands(integer, &self.thousands_separator);
        if let Some(fraction) = fraction {
            let sep = if self.decimal_separator.is_empty() {
                "."
            } else {
                self.decimal_separator.as_str()
            };
            body.push_str(sep);
            body.push_str(fraction);
        }

        if negative {
            if !self.hide_sign {
                body.insert(0, '-');
            }
            if !self.negative_format.is_empty() {
                body = self.negative_format.replace('#', &body);
            }
        }

        format!("{}{}{}", self.prefix, body, self.suffix)
    }
}

impl TextFormatter for NumericFormatter {
    fn format(&self, value: &TextValue) -> String {
        if value.is_empty() {
            return String::new();
        }
        match value.as_number() {
            Some(n) => self.format_number(n),
            None => "NaN".to_string(),
        }
    }
}

fn group_thousands(integer: &str, separator: &str) -> String {
    if separator.is_empty() {
        return integer.to_string();
    }
    let len = integer.chars().count();
    let mut out = String::with_capacity(integer.len() + len / 3 * separator.len());
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(digit);
    }
    out
}

/// Currency presets built on [`NumericFormatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Brl,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Chf,
}

impl Currency {
    pub fn formatter(self) -> NumericFormatter {
        match self {
            Currency::Brl => NumericFormatter::new(2).with_prefix("R$ ").with_separators(",", "."),
            Currency::Usd => NumericFormatter::new(2).with_prefix("$").with_separators(".", ","),
            Currency::Eur => NumericFormatter::new(2)
                .with_suffix(" €")
                .with_separators(",", ".")
                .with_negative_format(NEGATIVE_PARENTHESES),
            Currency::Gbp => NumericFormatter::new(2).with_prefix("£ ").with_separators(".", ","),
            Currency::Jpy => NumericFormatter::new(0).with_prefix("¥").with_separators("", ","),
            Currency::Chf => NumericFormatter::new(2).with_prefix("CHF ").with_separators(".", ","),
        }
    }
}

/// Tag selecting a registered formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    Integer,
    Real,
    Percentage,
    Currency,
}

/// Caller-owned map from [`TextKind`] to formatter.
#[derive(Clone)]
pub struct FormatterRegistry {
    formatters: HashMap<TextKind, Rc<dyn TextFormatter>>,
}

impl Default for FormatterRegistry {
    /// Integer (no decimals), Real (two decimals), Percentage (two decimals
    /// and a `%` suffix). Currency has no default.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(TextKind::Integer, NumericFormatter::new(0));
        registry.register(TextKind::Real, NumericFormatter::new(2));
        registry.register(TextKind::Percentage, NumericFormatter::new(2).with_suffix("%"));
        registry
    }
}

impl FormatterRegistry {
    pub fn empty() -> Self {
        Self {
            formatters: HashMap::new(),
        }
    }

    /// Register (or replace) the formatter for `kind`.
    pub fn register(&mut self, kind: TextKind, formatter: impl TextFormatter + 'static) {
        self.formatters.insert(kind, Rc::new(formatter));
    }

    pub fn get(&self, kind: TextKind) -> Option<Rc<dyn TextFormatter>> {
        self.formatters.get(&kind).cloned()
    }

    /// Format with the registered formatter, or plain display when none is.
    pub fn format(&self, kind: TextKind, value: &TextValue) -> String {
        match self.formatters.get(&kind) {
            Some(formatter) => formatter.format(value),
            None => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_defaults() {
        let f = NumericFormatter::new(2);
        assert_eq!(f.format(&TextValue::Real(3.14159)), "3.14");
        assert_eq!(f.format(&TextValue::Int(-7)), "-7.00");
        assert_eq!(f.format(&"12.5".into()), "12.50");
        assert_eq!(f.format(&"abc".into()), "NaN");
        assert_eq!(f.format(&TextValue::Empty), "");
    }

    #[test]
    fn thousands_grouping() {
        let f = NumericFormatter::new(2).with_separators(",", ".");
        assert_eq!(f.format(&TextValue::Real(1234567.891)), "1.234.567,89");
        assert_eq!(f.format(&TextValue::Real(999.0)), "999,00");
        assert_eq!(f.format(&TextValue::Real(1000.0)), "1.000,00");
    }

    #[test]
    fn currency_presets() {
        assert_eq!(Currency::Brl.formatter().format(&TextValue::Real(1500.5)), "R$ 1.500,50");
        assert_eq!(Currency::Usd.formatter().format(&TextValue::Int(-2500)), "$-2,500.00");
        assert_eq!(Currency::Eur.formatter().format(&TextValue::Real(-12.0)), "(-12,00) €");
        assert_eq!(Currency::Jpy.formatter().format(&TextValue::Int(1234567)), "¥1,234,567");
    }

    #[test]
    fn negative_format_and_hidden_sign() {
        let f = NumericFormatter::new(1)
            .with_negative_format(NEGATIVE_PARENTHESES)
            .with_hide_sign(true);
        assert_eq!(f.format(&TextValue::Real(-5.26)), "(5.3)");
        assert_eq!(f.format(&TextValue::Real(5.0)), "5.0");
    }

    #[test]
    fn transform_runs_before_formatting() {
        let f = NumericFormatter::new(0).with_suffix("%").with_transform(|v| v * 100.0);
        assert_eq!(f.format(&TextValue::Real(0.42)), "42%");
    }

    #[test]
    fn registry_is_per_instance() {
        let mut a = FormatterRegistry::default();
        let b = FormatterRegistry::default();
        a.register(TextKind::Real, |v: &TextValue| format!("<{}>", v));

        assert_eq!(a.format(TextKind::Real, &TextValue::Real(1.5)), "<1.5>");
        assert_eq!(b.format(TextKind::Real, &TextValue::Real(1.5)), "1.50");
        assert_eq!(b.format(TextKind::Percentage, &TextValue::Real(12.0)), "12.00%");
        assert_eq!(b.format(TextKind::Currency, &TextValue::Int(3)), "3");
    }
}
