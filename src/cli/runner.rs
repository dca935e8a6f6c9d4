//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands};
use crate::engine::{ReplicationEngine, SyncConfig};
use crate::error::{Error, Result};
use crate::messages::JsonLinesWriter;
use crate::metadata::{update_catalog_file, SelectionUpdate};
use crate::source::JsonlSource;
use crate::state::{State, StateManager};
use crate::types::{InvalidRecordPolicy, ReplicationMethod};
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Discover { output } => self.discover(output.as_deref()),
            Commands::Select {
                stream,
                key_properties,
                replication_method,
                replication_key,
                columns,
                deselect,
            } => self.select(
                stream,
                key_properties.as_deref(),
                replication_method.as_deref(),
                replication_key.as_deref(),
                columns.as_deref(),
                deselect.as_deref(),
            ),
            Commands::Read {
                state_interval,
                skip_invalid_records,
            } => self.read(*state_interval, *skip_invalid_records).await,
        }
    }

    /// Load the source from the definition file
    fn load_source(&self) -> Result<JsonlSource> {
        let path = self
            .cli
            .source
            .as_ref()
            .ok_or_else(|| Error::config("source definition not specified (use -S flag)"))?;
        JsonlSource::from_file(path)
    }

    /// The catalog file path, required for select and read
    fn catalog_path(&self) -> Result<&Path> {
        self.cli
            .catalog
            .as_deref()
            .ok_or_else(|| Error::config("catalog file not specified (use -c flag)"))
    }

    /// Run stream discovery and emit the catalog
    fn discover(&self, output: Option<&Path>) -> Result<()> {
        let source = self.load_source()?;
        let schemas = source.discover_schemas()?;
        let catalog = Catalog::discover(schemas, &source);

        tracing::info!(streams = catalog.streams.len(), "discovery complete");

        match output {
            Some(path) => catalog.to_file(path),
            None => {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
                Ok(())
            }
        }
    }

    /// Apply a selection update to the catalog file
    fn select(
        &self,
        stream: &str,
        key_properties: Option<&str>,
        replication_method: Option<&str>,
        replication_key: Option<&str>,
        columns: Option<&str>,
        deselect: Option<&str>,
    ) -> Result<()> {
        let method = replication_method
            .map(|m| {
                ReplicationMethod::parse(m).ok_or_else(|| Error::UnsupportedReplicationMethod {
                    stream: stream.to_string(),
                    method: m.to_string(),
                })
            })
            .transpose()?;

        let update = SelectionUpdate {
            stream_id: stream.to_string(),
            key_properties: key_properties.map(split_csv),
            replication_method: method,
            replication_key: replication_key.map(String::from),
            selected_columns: columns.map(split_csv),
            deselected_columns: deselect.map(split_csv).unwrap_or_default(),
        };

        update_catalog_file(self.catalog_path()?, &update)?;
        tracing::info!(stream, "selection updated");
        Ok(())
    }

    /// Sync selected streams to stdout
    async fn read(&self, state_interval: usize, skip_invalid_records: bool) -> Result<()> {
        let source = self.load_source()?;
        let catalog = Catalog::from_file(self.catalog_path()?)?;
        let state = self.load_state().await?;

        let policy = if skip_invalid_records {
            InvalidRecordPolicy::Skip
        } else {
            InvalidRecordPolicy::Abort
        };
        let config = SyncConfig::new()
            .with_state_interval(state_interval)
            .with_invalid_record_policy(policy);

        let mut engine =
            ReplicationEngine::new(JsonLinesWriter::stdout(), state).with_config(config);
        engine.sync(&catalog, &source).await?;

        if let Some(path) = &self.cli.state {
            StateManager::new(path).save(engine.state()).await?;
        }
        Ok(())
    }

    /// Resolve the starting state: inline JSON wins over the state file
    async fn load_state(&self) -> Result<State> {
        if let Some(json) = &self.cli.state_json {
            return StateManager::from_json(json);
        }
        if let Some(path) = &self.cli.state {
            return StateManager::new(path).load().await;
        }
        Ok(State::new())
    }
}

fn split_csv(s: impl AsRef<str>) -> Vec<String> {
    s.as_ref()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_csv(""), Vec::<String>::new());
    }
}
