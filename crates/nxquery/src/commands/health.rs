//! `nxquery health`: connectivity and version check.

use nxquery_core::Datasource;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(datasource: &Datasource, global: &GlobalOpts) -> Result<(), CliError> {
    let result = datasource.check_health().await;

    let out = match global.output {
        OutputFormat::Table => {
            let color = output::should_color(global.color);
            let label = output::status_label(&result.status.to_string(), result.is_ok(), color);
            format!("{label}: {}", result.message)
        }
        format => output::render_json(format, &result)?,
    };
    output::print_output(&out, global.quiet);

    if result.is_ok() {
        Ok(())
    } else {
        Err(CliError::Unhealthy {
            message: result.message,
        })
    }
}
