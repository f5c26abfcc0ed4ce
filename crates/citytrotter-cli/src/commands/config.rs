use crate::config_loader;
use crate::output::OutputWriter;
use crate::output_types::ConfigOutput;
use anyhow::Result;
use citytrotter_core::config::LayeredConfig;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(explicit: Option<&Path>, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let config_file = config_loader::config_file(explicit);

    if output.is_json() {
        return output.result(ConfigOutput {
            config_file: config_file.map(|p| p.display().to_string()),
            api_url: config.api_url.clone(),
            debounce_ms: config.debounce_ms.clone(),
            request_timeout_secs: config.request_timeout_secs.clone(),
        });
    }

    output.section("Configuration Values");

    let mut rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    output.table(rows);

    match config_file {
        Some(path) => output.info(format!("Config file: {}", path.display())),
        None => output.info(format!(
            "No {} found; using defaults and environment",
            config_loader::DEFAULT_CONFIG_FILE
        )),
    }

    Ok(())
}
