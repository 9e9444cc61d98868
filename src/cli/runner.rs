//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, ClientConfig};
use crate::error::Result;
use crate::http::{CallExecutor, Credential, Endpoint};
use crate::pagination::{concat_response_pages, PageConfig, PagedResponseGetter, ResponseAggregator};
use crate::query::merge_query_params;
use crate::types::JsonValue;
use tracing::debug;
use url::Url;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its result
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let executor = CallExecutor::from_config(&config)?;
        let value = self.execute(&executor).await?;
        println!("{}", self.render(&value)?);
        Ok(())
    }

    /// Run the CLI command against an executor and return its result
    pub async fn execute(&self, executor: &CallExecutor) -> Result<JsonValue> {
        let credential = Credential::env(&self.cli.api_key_env);

        match &self.cli.command {
            Commands::Get { url, params } => {
                Url::parse(url)?;
                let url = merge_query_params(url, pairs(params))?;
                let body = executor.call_api(&Endpoint::get(url, credential)).await?;
                Ok(JsonValue::Object(body))
            }
            Commands::Post { url, json } => {
                Url::parse(url)?;
                let mut endpoint = Endpoint::post(url, credential);
                if let Some(body) = json {
                    endpoint = endpoint.json(serde_json::from_str(body)?);
                }
                let body = executor.call_api(&endpoint).await?;
                Ok(JsonValue::Object(body))
            }
            Commands::Delete { url } => {
                Url::parse(url)?;
                let body = executor.call_api(&Endpoint::delete(url, credential)).await?;
                Ok(JsonValue::Object(body))
            }
            Commands::Pages {
                url,
                params,
                field,
                cursor_field,
                cursor_param,
            } => {
                Url::parse(url)?;
                let template = PagedResponseGetter::new(url, credential)
                    .with_config(PageConfig::new(cursor_field, cursor_param));
                let pages = ResponseAggregator::new(executor, template)
                    .get_responses_with_params(url, pairs(params))
                    .await?;
                debug!("Collected {} pages", pages.len());

                match field {
                    Some(field) => Ok(JsonValue::Array(concat_response_pages(&pages, field)?)),
                    None => Ok(JsonValue::Array(
                        pages.into_iter().map(JsonValue::Object).collect(),
                    )),
                }
            }
        }
    }

    /// Format a value for output
    pub fn render(&self, value: &JsonValue) -> Result<String> {
        Ok(match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        })
    }

    /// Load pacing config, falling back to defaults
    fn load_config(&self) -> Result<ClientConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => Ok(ClientConfig::default()),
        }
    }
}

fn pairs(params: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> {
    params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}
