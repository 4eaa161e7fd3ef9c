//! Benefits repository backed by the upstream gateway.
//!
//! Listing is lenient: records that fail to decode or validate are logged and
//! skipped while the rest are returned in upstream order. A single lookup
//! reports a 404, a malformed record, or a record that fails validation as
//! `None`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, warn};

use super::dto::map_record;
use crate::domain::Benefit;
use crate::domain::ports::{BenefitsRepository, BenefitsRepositoryError, UpstreamGateway};

const COLLECTION_PATH: &str = "beneficios";

/// Repository adapter mapping upstream documents into domain benefits.
#[derive(Clone)]
pub struct UpstreamBenefitsRepository<G> {
    gateway: Arc<G>,
}

impl<G> UpstreamBenefitsRepository<G> {
    /// Create a repository over the given gateway.
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

/// Dot segments survive percent-encoding and would resolve above the
/// collection, so they can never name a benefit.
fn is_dot_segment(id: &str) -> bool {
    matches!(id, "." | "..")
}

fn item_path(id: &str) -> String {
    format!("{COLLECTION_PATH}/{}", urlencoding::encode(id))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl<G> BenefitsRepository for UpstreamBenefitsRepository<G>
where
    G: UpstreamGateway,
{
    async fn list_all(&self) -> Result<Vec<Benefit>, BenefitsRepositoryError> {
        info!("fetching benefits from upstream catalogue");
        let payload = self.gateway.fetch(COLLECTION_PATH).await?;

        let Value::Array(records) = payload else {
            let kind = json_kind(&payload);
            error!(kind, "upstream benefits payload is not an array");
            return Err(BenefitsRepositoryError::invalid_payload(format!(
                "expected a JSON array of benefits, received {kind}"
            )));
        };

        let total = records.len();
        let benefits: Vec<Benefit> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match map_record(record) {
                Ok(benefit) => Some(benefit),
                Err(rejection) => {
                    warn!(index, reason = %rejection, "dropping invalid upstream benefit");
                    None
                }
            })
            .collect();
        info!(total, accepted = benefits.len(), "upstream benefits mapped");
        Ok(benefits)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Benefit>, BenefitsRepositoryError> {
        if is_dot_segment(id) {
            warn!(id, "benefit id is a dot segment; treating as absent");
            return Ok(None);
        }
        info!(id, "fetching benefit from upstream catalogue");
        let payload = match self.gateway.fetch(&item_path(id)).await {
            Ok(payload) => payload,
            Err(cause) if cause.is_not_found() => {
                info!(id, "upstream reports benefit as absent");
                return Ok(None);
            }
            Err(cause) => return Err(cause.into()),
        };

        match map_record(payload) {
            Ok(benefit) => Ok(Some(benefit)),
            Err(rejection) => {
                warn!(id, reason = %rejection, "upstream benefit is invalid; treating as absent");
                Ok(None)
            }
        }
    }
}
