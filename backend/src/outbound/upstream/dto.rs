//! DTO for decoding upstream benefit records.
//!
//! Each record is decoded on its own so a single malformed element cannot
//! fail a whole listing. Every field is optional at this layer; the domain
//! constructor enforces the required ones.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{Benefit, BenefitValidationError};

/// Reasons an upstream record is not accepted as a benefit.
#[derive(Debug, Error)]
pub(super) enum RecordRejection {
    #[error("record does not decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("record is missing `{0}`")]
    Missing(&'static str),
    #[error(transparent)]
    Invalid(#[from] BenefitValidationError),
}

#[derive(Debug, Deserialize)]
pub(super) struct UpstreamBenefitDto {
    id: Option<i64>,
    comercio: Option<String>,
    descripcion: Option<String>,
    aclaracion: Option<String>,
    tarjeta: Option<bool>,
    efectivo: Option<bool>,
    vencimiento: Option<String>,
    categoria: Option<String>,
    #[serde(rename = "imagenUrl")]
    imagen_url: Option<String>,
}

impl UpstreamBenefitDto {
    fn into_domain(self) -> Result<Benefit, RecordRejection> {
        let id = self.id.ok_or(RecordRejection::Missing("id"))?;
        let merchant = self.comercio.ok_or(RecordRejection::Missing("comercio"))?;
        let description = self
            .descripcion
            .ok_or(RecordRejection::Missing("descripcion"))?;

        let mut benefit = Benefit::new(id, merchant, description)?
            .with_accepts_card(self.tarjeta.unwrap_or(false))
            .with_accepts_cash(self.efectivo.unwrap_or(false));
        if let Some(clarification) = self.aclaracion {
            benefit = benefit.with_clarification(clarification);
        }
        if let Some(expiration) = self.vencimiento {
            benefit = benefit.with_expiration(expiration);
        }
        if let Some(category) = self.categoria {
            benefit = benefit.with_category(category);
        }
        if let Some(image_url) = self.imagen_url {
            benefit = benefit.with_image_url(image_url);
        }
        Ok(benefit)
    }
}

/// Decode and validate one upstream record.
pub(super) fn map_record(record: Value) -> Result<Benefit, RecordRejection> {
    let dto: UpstreamBenefitDto = serde_json::from_value(record)?;
    dto.into_domain()
}
