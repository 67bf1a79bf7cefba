//! Dataset sources: snapshot files and live environments

use std::env;
use std::fs;

use anyhow::Context;
use anyhow::bail;
use grouped_grid_lib::DatasetUpdate;
use grouped_grid_lib::MetadataHost;
use grouped_grid_lib::auth::StaticTokenProvider;
use grouped_grid_lib::host::Snapshot;
use grouped_grid_lib::host::WebApiHost;
use grouped_grid_lib::model::Column;
use grouped_grid_lib::model::PagingInfo;

use crate::args::SourceArgs;
use crate::config::Settings;

pub enum Source {
    Snapshot(Snapshot),
    WebApi { host: WebApiHost, entity: String },
}

impl Source {
    pub fn open(args: &SourceArgs, settings: &Settings) -> anyhow::Result<Self> {
        if let Some(path) = &args.snapshot {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let mut snapshot = Snapshot::from_json(&text)?;
            if let Some(entity) = &args.entity {
                snapshot.entity = entity.clone();
            }
            log::info!(
                "loaded {} records of {} from {}",
                snapshot.records.len(),
                snapshot.entity,
                path.display()
            );
            return Ok(Source::Snapshot(snapshot));
        }

        let Some(url) = args.url.clone().or_else(|| settings.url.clone()) else {
            bail!("Pass --snapshot or --url, or set url in the config file");
        };
        let Some(entity) = args.entity.clone() else {
            bail!("--entity is required with --url");
        };
        let token = env::var(settings.token_var())
            .with_context(|| format!("{} is not set", settings.token_var()))?;
        let host = WebApiHost::builder()
            .url(url)
            .token_provider(StaticTokenProvider::new(token))
            .build()?;
        Ok(Source::WebApi { host, entity })
    }
}

/// Fetches the first `top` records of `entity` with the given attributes.
pub async fn fetch_update(
    host: &WebApiHost,
    entity: &str,
    attributes: &[String],
    top: usize,
) -> anyhow::Result<DatasetUpdate> {
    if attributes.is_empty() {
        bail!("--columns is required with --url");
    }
    let names: Vec<&str> = attributes.iter().map(String::as_str).collect();
    let metadata = host.get_entity_metadata(entity, &names).await?;

    let mut columns = Vec::with_capacity(names.len());
    let mut select = Vec::with_capacity(names.len());
    for (order, name) in names.iter().enumerate() {
        let Some(attribute) = metadata.attribute(name) else {
            bail!("{} has no attribute '{}'", entity, name);
        };
        select.push(if attribute.is_lookup() {
            format!("_{}_value", name)
        } else {
            name.to_string()
        });
        columns.push(Column::from_attribute(attribute, order as i32));
    }

    let query = format!("?$select={}&$top={}", select.join(","), top);
    let records = host.retrieve_multiple_records(entity, &query).await?;
    Ok(DatasetUpdate {
        columns,
        paging: PagingInfo {
            total_result_count: records.len() as i64,
            ..PagingInfo::default()
        },
        records,
        ..DatasetUpdate::default()
    })
}
