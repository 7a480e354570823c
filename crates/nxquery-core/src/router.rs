// ── Query router ──
//
// Runs a batch one query at a time, in input order. Every refId gets
// exactly one `DataResponse`; a failing query never stops its siblings.
// Settings are loaded and a client is built per query.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::handlers;
use crate::model::{
    DataQuery, DataResponse, Frame, QueryDataRequest, QueryDataResponse, QueryModel, QueryType,
};
use crate::settings::{InstanceSettings, Settings};

/// Entry point for query batches against one configured data source.
#[derive(Debug, Clone)]
pub struct Datasource {
    instance: InstanceSettings,
}

impl Datasource {
    pub fn new(instance: InstanceSettings) -> Self {
        Self { instance }
    }

    pub fn instance_settings(&self) -> &InstanceSettings {
        &self.instance
    }

    /// Load the settings snapshot for one call.
    pub fn settings(&self) -> Result<Settings, CoreError> {
        Settings::load(&self.instance)
    }

    /// Run a batch.
    ///
    /// Once `cancel` fires, the in-flight call is dropped and the remaining
    /// queries are reported as cancelled without being attempted.
    pub async fn query_data(
        &self,
        request: QueryDataRequest,
        cancel: &CancellationToken,
    ) -> QueryDataResponse {
        let mut response = QueryDataResponse::default();

        for query in request.queries {
            let result = if cancel.is_cancelled() {
                Err(CoreError::Cancelled)
            } else {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => Err(CoreError::Cancelled),
                    result = self.run_query(&query) => result,
                }
            };

            if let Err(ref e) = result {
                warn!(ref_id = %query.ref_id, query_type = %query.query_type, error = %e, "query failed");
            }
            response
                .responses
                .insert(query.ref_id, DataResponse::from(result));
        }

        response
    }

    async fn run_query(&self, query: &DataQuery) -> Result<Vec<Frame>, CoreError> {
        let query_type: QueryType =
            query
                .query_type
                .parse()
                .map_err(|_| CoreError::UnsupportedQueryType {
                    query_type: query.query_type.clone(),
                })?;
        let model = QueryModel::parse(&query.json)?;
        let client = self.settings()?.client()?;

        debug!(ref_id = %query.ref_id, %query_type, "running query");
        match query_type {
            QueryType::Alarms => handlers::alarms(&client, &model).await,
            QueryType::ObjectStatus => handlers::object_status(&client, &model).await,
            QueryType::DciValues => handlers::dci_values(&client, &model, &query.time_range).await,
            QueryType::SummaryTables => {
                handlers::table(&client, &model, &handlers::SUMMARY_TABLE).await
            }
            QueryType::ObjectQueries => {
                handlers::table(&client, &model, &handlers::OBJECT_QUERY).await
            }
        }
    }
}
