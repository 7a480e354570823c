//! `nxquery query`: run a batch file through the router.

use std::collections::HashSet;
use std::io::Read;

use bytes::Bytes;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::Value;

use nxquery_core::{
    CancellationToken, DataQuery, Datasource, QueryDataRequest, QueryDataResponse, TimeRange,
};

use crate::cli::{GlobalOpts, OutputFormat, QueryArgs};
use crate::error::CliError;
use crate::output;

#[derive(Deserialize)]
struct BatchFile {
    queries: Vec<Value>,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    datasource: &Datasource,
    args: &QueryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let raw = read_input(args)?;
    let to = args.to.unwrap_or_else(Utc::now);
    let from = args.from.unwrap_or(to - Duration::hours(1));
    let request = parse_batch(&raw, TimeRange { from, to })?;
    let total = request.queries.len();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling remaining queries");
            on_interrupt.cancel();
        }
    });
    let response = datasource.query_data(request, &cancel).await;
    watcher.abort();

    let out = match global.output {
        OutputFormat::Table => render_table(&response, output::should_color(global.color)),
        format => output::render_json(format, &response)?,
    };
    output::print_output(&out, global.quiet);

    let failed = response.responses.values().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        return Err(CliError::QueriesFailed { failed, total });
    }
    Ok(())
}

fn read_input(args: &QueryArgs) -> Result<Vec<u8>, CliError> {
    if args.input.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(&args.input)?)
    }
}

// ── Batch parsing ───────────────────────────────────────────────────

/// Split a batch file into queries.
///
/// Each entry keeps its full JSON as the query model, so a malformed model
/// only fails that entry. Missing refIds are numbered `A`, `B`, ..., skipping
/// any id already used explicitly in the batch.
pub fn parse_batch(raw: &[u8], default_range: TimeRange) -> Result<QueryDataRequest, CliError> {
    let batch: BatchFile = serde_json::from_slice(raw)?;

    let mut taken: HashSet<String> = batch
        .queries
        .iter()
        .filter_map(|entry| entry.get("refId").and_then(Value::as_str))
        .map(str::to_owned)
        .collect();
    let mut next_default = 0;

    let mut queries = Vec::with_capacity(batch.queries.len());
    for entry in batch.queries {
        let ref_id = match entry.get("refId").and_then(Value::as_str) {
            Some(id) => id.to_owned(),
            None => next_free_ref_id(&mut taken, &mut next_default),
        };
        let query_type = entry
            .get("queryType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let time_range = entry
            .get("timeRange")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(default_range);
        queries.push(DataQuery {
            ref_id,
            query_type,
            time_range,
            json: Bytes::from(serde_json::to_vec(&entry)?),
        });
    }

    Ok(QueryDataRequest { queries })
}

fn next_free_ref_id(taken: &mut HashSet<String>, next: &mut usize) -> String {
    loop {
        let candidate = default_ref_id(*next);
        *next += 1;
        if taken.insert(candidate.clone()) {
            return candidate;
        }
    }
}

fn default_ref_id(idx: usize) -> String {
    u8::try_from(idx)
        .ok()
        .filter(|i| *i < 26)
        .map_or_else(|| format!("Q{idx}"), |i| char::from(b'A' + i).to_string())
}

// ── Table view ──────────────────────────────────────────────────────

fn render_table(response: &QueryDataResponse, color: bool) -> String {
    let mut sections = Vec::new();
    for (ref_id, result) in &response.responses {
        let label = output::status_label(&result.status.to_string(), result.is_ok(), color);
        sections.push(output::heading(&format!("── {ref_id} ({label}) ──"), color));

        if let Some(ref err) = result.error {
            sections.push(err.message.clone());
            continue;
        }
        for frame in &result.frames {
            sections.push(format!("{}\n{}", frame.name, output::render_frame(frame)));
        }
    }
    sections.join("\n")
}
