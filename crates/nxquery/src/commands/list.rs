//! `nxquery list`: selector lists through the list proxy.

use serde::Deserialize;
use serde_json::Value;
use tabled::Tabled;

use nxquery_core::{Datasource, ListResource, ResourceRequest};

use crate::cli::{GlobalOpts, ListArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NamedObject {
    name: String,
    id: Value,
}

#[derive(Deserialize)]
struct ObjectList {
    objects: Vec<NamedObject>,
}

#[derive(Tabled)]
struct ObjectRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<NamedObject> for ObjectRow {
    fn from(o: NamedObject) -> Self {
        Self {
            name: o.name,
            id: match o.id {
                Value::String(s) => s,
                other => other.to_string(),
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    datasource: &Datasource,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let request = resource_request(args.resource, args.object_id);
    let response = datasource.call_resource(&request).await;

    if !response.is_success() {
        return Err(CliError::ListFailed {
            status: response.status,
            message: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }

    let out = match global.output {
        OutputFormat::Table => match serde_json::from_slice::<ObjectList>(&response.body) {
            Ok(list) => {
                let rows: Vec<ObjectRow> = list.objects.into_iter().map(ObjectRow::from).collect();
                output::render_rows(&rows)
            }
            Err(_) => render_body(OutputFormat::Json, &response.body)?,
        },
        format => render_body(format, &response.body)?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

fn resource_request(resource: ListResource, object_id: Option<i64>) -> ResourceRequest {
    ResourceRequest {
        path: resource.to_string(),
        params: object_id
            .map(|id| vec![("objectId".to_owned(), id.to_string())])
            .unwrap_or_default(),
    }
}

fn render_body(format: OutputFormat, body: &[u8]) -> Result<String, CliError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => output::render_json(format, &value),
        Err(_) => Ok(String::from_utf8_lossy(body).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dci_request_carries_object_id() {
        let request = resource_request(ListResource::Dcis, Some(42));
        assert_eq!(request.path, "dcis");
        assert_eq!(request.param("objectId"), Some("42"));

        let request = resource_request(ListResource::SummaryTables, None);
        assert_eq!(request.path, "summaryTables");
        assert!(request.params.is_empty());
    }
}
