use super::data_client;
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::HealthOutput;
use anyhow::Result;
use citytrotter_core::config::LayeredConfig;
use citytrotter_core::ports::DataLayerClient;

pub async fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = data_client(config)?;
    let api_url = client.base_url();

    let health = client.health().await.map_err(|e| errors::service_failed(api_url, &e))?;
    let healthy = health.is_healthy();

    if output.is_json() {
        return output.result(HealthOutput { api_url: api_url.to_string(), healthy, health });
    }

    if healthy {
        output.success(format!("Analysis service is up at {}", api_url));
    } else {
        output.warning(format!("Analysis service at {} reports '{}'", api_url, health.status));
    }
    if let Some(ref database) = health.database {
        output.kv("Database", database);
    }
    if let Some(ref services) = health.services {
        output.kv("Services", services);
    }

    Ok(())
}
