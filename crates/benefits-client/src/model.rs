//! Wire model for catalogue responses.

use serde::{Deserialize, Serialize};

/// A benefit as served by `/api/beneficios`.
///
/// Field names follow Rust conventions; the serde attributes map them onto
/// the Spanish keys of the JSON contract.
///
/// # Example
///
/// ```
/// use benefits_client::Benefit;
///
/// let json = r#"{
///     "id": 1,
///     "comercio": "WALMART",
///     "descripcion": "10% off",
///     "aclaracion": "",
///     "tarjeta": true,
///     "efectivo": false,
///     "vencimiento": "",
///     "categoria": "Sin categoría",
///     "imagenUrl": ""
/// }"#;
///
/// let benefit: Benefit = serde_json::from_str(json).expect("valid benefit");
/// assert_eq!(benefit.merchant, "WALMART");
/// assert!(benefit.accepts_card);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefit {
    /// Catalogue identifier.
    pub id: i64,
    /// Merchant offering the benefit.
    #[serde(rename = "comercio")]
    pub merchant: String,
    /// Short description.
    #[serde(rename = "descripcion")]
    pub description: String,
    /// Free-text clarification, empty when unknown.
    #[serde(rename = "aclaracion")]
    pub clarification: String,
    /// Card payments qualify.
    #[serde(rename = "tarjeta")]
    pub accepts_card: bool,
    /// Cash payments qualify.
    #[serde(rename = "efectivo")]
    pub accepts_cash: bool,
    /// Expiration timestamp as published, empty when unknown.
    #[serde(rename = "vencimiento")]
    pub expiration: String,
    /// Category label.
    #[serde(rename = "categoria")]
    pub category: String,
    /// Image URL, empty when unknown.
    #[serde(rename = "imagenUrl")]
    pub image_url: String,
}
