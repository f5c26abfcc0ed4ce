use super::data_client;
use crate::cli::{LayerTarget, LayersArgs};
use crate::errors;
use crate::output::OutputWriter;
use crate::output_types::{LayerOutput, SummaryOutput};
use anyhow::Result;
use citytrotter_core::config::LayeredConfig;
use citytrotter_core::models::{DataLayer, LayerSummary};
use citytrotter_core::ports::DataLayerClient;
use futures::future::join_all;
use tabled::Tabled;

#[derive(Tabled)]
struct LayerRow {
    #[tabled(rename = "Layer")]
    layer: String,
    #[tabled(rename = "Features")]
    count: String,
    #[tabled(rename = "Last Updated")]
    last_updated: String,
}

pub async fn execute(args: LayersArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let client = data_client(config)?;
    let api_url = client.base_url();

    let layer = match args.target {
        LayerTarget::Schools => DataLayer::Schools,
        LayerTarget::Zoning => DataLayer::Zoning,
        LayerTarget::MartaStations => DataLayer::MartaStations,
        LayerTarget::Heatmap => DataLayer::ImpactHeatmap,
        LayerTarget::Summary => return summary(&client, api_url, output).await,
        LayerTarget::All => return all_layers(&client, output).await,
    };

    let features =
        client.fetch_layer(layer).await.map_err(|e| errors::service_failed(api_url, &e))?;
    let feature_count = features.features.len();
    tracing::debug!(layer = %layer, feature_count, "Fetched data layer");

    if output.is_json() {
        output.result(LayerOutput { layer: layer.to_string(), feature_count, features })?;
    } else {
        output.section(format!("Layer: {}", layer));
        output.kv("Features", feature_count);
        output.kv("Source", format!("{}{}", api_url, layer.path()));
    }

    Ok(())
}

async fn summary(
    client: &impl DataLayerClient,
    api_url: &str,
    output: &OutputWriter,
) -> Result<()> {
    let summary = client.data_summary().await.map_err(|e| errors::service_failed(api_url, &e))?;

    if output.is_json() {
        return output.result(SummaryOutput { api_url: api_url.to_string(), summary });
    }

    output.section("Data Summary");
    output.table(vec![
        summary_row(DataLayer::Schools, &summary.schools),
        summary_row(DataLayer::Zoning, &summary.zoning),
        summary_row(DataLayer::MartaStations, &summary.marta_stations),
    ]);
    Ok(())
}

fn summary_row(layer: DataLayer, summary: &LayerSummary) -> LayerRow {
    LayerRow {
        layer: layer.to_string(),
        count: summary.count.to_string(),
        last_updated: summary
            .last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string()),
    }
}

/// Fetch every layer at once. A failing layer is reported without
/// aborting the others.
async fn all_layers(client: &impl DataLayerClient, output: &OutputWriter) -> Result<()> {
    let fetches = DataLayer::ALL.map(|layer| async move { (layer, client.fetch_layer(layer).await) });
    let results = join_all(fetches).await;

    let mut counts = serde_json::Map::new();
    let mut rows = Vec::new();
    for (layer, result) in results {
        match result {
            Ok(features) => {
                let count = features.features.len();
                counts.insert(layer.to_string(), count.into());
                rows.push(LayerRow {
                    layer: layer.to_string(),
                    count: count.to_string(),
                    last_updated: "-".to_string(),
                });
            }
            Err(e) => {
                output.warning(format!("{}: {}", layer, e));
                counts.insert(layer.to_string(), serde_json::Value::Null);
                rows.push(LayerRow {
                    layer: layer.to_string(),
                    count: "unavailable".to_string(),
                    last_updated: "-".to_string(),
                });
            }
        }
    }

    if output.is_json() {
        return output.result(counts);
    }

    output.section("Data Layers");
    output.table(rows);
    Ok(())
}
