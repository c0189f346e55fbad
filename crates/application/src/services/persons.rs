//! Household persons from `/api/persons/`.

use paragon_domain::Person;

use crate::auth::AuthPipeline;
use crate::error::ApiResult;
use crate::ports::ApiRequest;

const PERSONS_PATH: &str = "/api/persons/";

/// Read access to the persons list, with payer/owner views.
#[derive(Debug, Clone)]
pub struct PersonsService {
    pipeline: AuthPipeline,
}

impl PersonsService {
    /// Creates the service.
    #[must_use]
    pub const fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    /// Lists all persons.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn list(&self) -> ApiResult<Vec<Person>> {
        let response = self.pipeline.send(ApiRequest::get(PERSONS_PATH)).await?;
        response.json()
    }

    /// Persons selectable as a receipt's payer.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list`].
    pub async fn payers(&self) -> ApiResult<Vec<Person>> {
        let mut persons = self.list().await?;
        persons.retain(|p| p.payer);
        Ok(persons)
    }

    /// Persons selectable as item owners.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list`].
    pub async fn owners(&self) -> ApiResult<Vec<Person>> {
        let mut persons = self.list().await?;
        persons.retain(|p| p.owner);
        Ok(persons)
    }
}
