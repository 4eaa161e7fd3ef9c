//! Benefit entity offered by the upstream catalogue.
//!
//! A [`Benefit`] can only be built from a positive identifier, a merchant,
//! and a description. Every other attribute is optional upstream and falls
//! back to a neutral default, so consumers never observe a half-populated
//! record.

use std::fmt;

use thiserror::Error;

/// Category label used when the upstream record carries none.
pub const UNCATEGORISED: &str = "Sin categoría";

/// Validation errors raised while constructing a [`Benefit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BenefitValidationError {
    /// The identifier is zero or negative.
    #[error("benefit id must be a positive integer, got {0}")]
    NonPositiveId(i64),
    /// The merchant name is empty once trimmed.
    #[error("benefit merchant must not be empty")]
    EmptyMerchant,
    /// The description is empty once trimmed.
    #[error("benefit description must not be empty")]
    EmptyDescription,
}

/// Positive catalogue identifier.
///
/// # Examples
/// ```
/// use benefits_backend::domain::BenefitId;
///
/// let id = BenefitId::new(7).expect("positive id");
/// assert_eq!(id.get(), 7);
/// assert!(BenefitId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BenefitId(i64);

impl BenefitId {
    /// Validate and wrap a raw identifier.
    pub fn new(value: i64) -> Result<Self, BenefitValidationError> {
        if value <= 0 {
            return Err(BenefitValidationError::NonPositiveId(value));
        }
        Ok(Self(value))
    }

    /// Return the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BenefitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for BenefitId {
    type Error = BenefitValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A commercial benefit offered to club members.
///
/// ## Invariants
/// - `id` is positive.
/// - `merchant` and `description` are non-empty once trimmed.
/// - `category` is never empty; it falls back to [`UNCATEGORISED`].
///
/// # Examples
/// ```
/// use benefits_backend::domain::{Benefit, UNCATEGORISED};
///
/// let benefit = Benefit::new(1, "WALMART", "10% off")
///     .expect("valid benefit")
///     .with_accepts_card(true);
/// assert_eq!(benefit.merchant(), "WALMART");
/// assert!(benefit.accepts_card());
/// assert!(!benefit.accepts_cash());
/// assert_eq!(benefit.category(), UNCATEGORISED);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Benefit {
    id: BenefitId,
    merchant: String,
    description: String,
    clarification: String,
    accepts_card: bool,
    accepts_cash: bool,
    expiration: String,
    category: String,
    image_url: String,
}

impl Benefit {
    /// Construct a benefit from its required fields, applying defaults to the
    /// rest.
    pub fn new(
        id: i64,
        merchant: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, BenefitValidationError> {
        let id = BenefitId::new(id)?;
        let merchant = merchant.into();
        if merchant.trim().is_empty() {
            return Err(BenefitValidationError::EmptyMerchant);
        }
        let description = description.into();
        if description.trim().is_empty() {
            return Err(BenefitValidationError::EmptyDescription);
        }

        Ok(Self {
            id,
            merchant,
            description,
            clarification: String::new(),
            accepts_card: false,
            accepts_cash: false,
            expiration: String::new(),
            category: UNCATEGORISED.to_owned(),
            image_url: String::new(),
        })
    }

    /// Attach the free-text clarification.
    #[must_use]
    pub fn with_clarification(mut self, clarification: impl Into<String>) -> Self {
        self.clarification = clarification.into();
        self
    }

    /// Record whether card payments qualify.
    #[must_use]
    pub fn with_accepts_card(mut self, accepts_card: bool) -> Self {
        self.accepts_card = accepts_card;
        self
    }

    /// Record whether cash payments qualify.
    #[must_use]
    pub fn with_accepts_cash(mut self, accepts_cash: bool) -> Self {
        self.accepts_cash = accepts_cash;
        self
    }

    /// Attach the expiration timestamp exactly as the upstream supplied it.
    #[must_use]
    pub fn with_expiration(mut self, expiration: impl Into<String>) -> Self {
        self.expiration = expiration.into();
        self
    }

    /// Attach the category. Empty values keep the uncategorised label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        if !category.is_empty() {
            self.category = category;
        }
        self
    }

    /// Attach the image URL.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Catalogue identifier.
    #[must_use]
    pub const fn id(&self) -> BenefitId {
        self.id
    }

    /// Merchant offering the benefit.
    #[must_use]
    pub fn merchant(&self) -> &str {
        &self.merchant
    }

    /// Short description of the benefit.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Clarification text, empty when the upstream sent none.
    #[must_use]
    pub fn clarification(&self) -> &str {
        &self.clarification
    }

    /// Whether card payments qualify.
    #[must_use]
    pub const fn accepts_card(&self) -> bool {
        self.accepts_card
    }

    /// Whether cash payments qualify.
    #[must_use]
    pub const fn accepts_cash(&self) -> bool {
        self.accepts_cash
    }

    /// Expiration timestamp, empty when unknown. Not parsed.
    #[must_use]
    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// Category label.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Image URL, empty when the upstream sent none.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}
