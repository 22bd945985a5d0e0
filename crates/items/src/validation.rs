//! Business validation rules for item fields.
//!
//! These are pure checks, independent of persistence. The database carries
//! matching constraints; the rules here exist so bad input is rejected before a
//! round-trip and with a precise message.

use std::sync::LazyLock;

use regex::Regex;

use catalog_core::{DomainError, DomainResult};

// ASCII digits only: `\d` would also admit other Unicode decimal digits.
#[allow(clippy::expect_used)]
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("static regex should not panic")
});

/// A name is valid when it is non-empty after trimming.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// A price is valid when, after trimming, it is one or more digits optionally
/// followed by `.` and one or two digits, and at least one digit is non-zero.
///
/// `"10"`, `"10.5"` and `"10.50"` pass; `"0"`, `"0.00"`, `".50"`, `"-1.00"` and
/// `"1,00"` do not.
pub fn is_valid_price(value: &str) -> bool {
    let price = value.trim();
    PRICE_PATTERN.is_match(price) && price.bytes().any(|b| (b'1'..=b'9').contains(&b))
}

/// Stock may not be negative.
pub fn is_valid_stock(stock: i32) -> bool {
    stock >= 0
}

/// A price that passed [`is_valid_price`], normalised (trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price(String);

impl Price {
    pub fn parse(value: &str) -> DomainResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_input("price is required"));
        }
        if !is_valid_price(trimmed) {
            return Err(DomainError::invalid_input(
                "price must be a positive decimal with at most 2 fraction digits",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
