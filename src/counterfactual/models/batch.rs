//! Multi-entity batches — one merged forecast per entity.
//!
//! An entity is one independent series (a sensor, a site, a product) with
//! its own [`TimeFrame`]. [`CounterfactualGenerator::generate_entities`]
//! runs [`CounterfactualGenerator::generate_multiple`] for each entity
//! against the same events. An entity for which no event could be processed
//! is skipped with a warning; the batch fails only when every entity fails.
use rayon::prelude::*;
use tracing::warn;

use crate::counterfactual::{
    core::{events::Event, frame::TimeFrame, options::Execution},
    errors::{CFResult, CounterfactualError},
    models::{
        generator::{ColumnOverrides, CounterfactualGenerator},
        output::ForecastFrame,
    },
};

/// Entity — identifier plus its own observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub frame: TimeFrame,
}

impl Entity {
    pub fn new(id: impl Into<String>, frame: TimeFrame) -> Self {
        Entity { id: id.into(), frame }
    }
}

/// EntityForecast — merged counterfactuals for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityForecast {
    pub entity: String,
    pub forecast: ForecastFrame,
}

impl CounterfactualGenerator {
    /// Counterfactuals for every entity, in input order.
    ///
    /// # Errors
    /// - Any error other than `NoEventsProcessed` from an entity's batch.
    /// - `NoEntitiesProcessed` if no entity produced a forecast.
    pub fn generate_entities(
        &self, entities: &[Entity], events: &[Event], columns: ColumnOverrides<'_>,
    ) -> CFResult<Vec<EntityForecast>> {
        let run = |entity: &Entity| self.generate_multiple(&entity.frame, events, columns);
        let outcomes: Vec<CFResult<ForecastFrame>> = match self.options().execution {
            Execution::Sequential => entities.iter().map(run).collect(),
            Execution::Parallel => entities.par_iter().map(run).collect(),
        };

        let mut forecasts = Vec::with_capacity(entities.len());
        for (entity, outcome) in entities.iter().zip(outcomes) {
            match outcome {
                Ok(forecast) => forecasts.push(EntityForecast { entity: entity.id.clone(), forecast }),
                Err(err @ CounterfactualError::NoEventsProcessed { .. }) => {
                    warn!(entity = entity.id.as_str(), error = %err, "skipping entity");
                }
                Err(err) => return Err(err),
            }
        }

        if forecasts.is_empty() {
            return Err(CounterfactualError::NoEntitiesProcessed { attempted: entities.len() });
        }
        Ok(forecasts)
    }
}
