//! Delivery recipients and their postal addresses.

use crate::domain::RecipientId;

/// A stored recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// Primary key.
    pub id: RecipientId,
    /// Recipient name.
    pub name: String,
    /// Street name.
    pub street: String,
    /// House number.
    pub number: i32,
    /// Apartment, block or other address complement.
    pub complement: Option<String>,
    /// State abbreviation.
    pub state: String,
    /// City name.
    pub city: String,
    /// Postal code.
    pub cep: String,
}

/// Values for a recipient that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipient {
    pub name: String,
    pub street: String,
    pub number: i32,
    pub complement: Option<String>,
    pub state: String,
    pub city: String,
    pub cep: String,
}

/// Partial update applied to a stored recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientChanges {
    pub name: Option<String>,
    pub street: Option<String>,
    pub number: Option<i32>,
    pub complement: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub cep: Option<String>,
}
