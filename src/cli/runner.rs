//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::ArrayClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::types::Arguments;
use futures::future::try_join_all;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

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
            Commands::List {
                operation,
                args,
                page_size,
                max_pages,
                timeout_secs,
            } => {
                self.list(
                    operation,
                    args.as_deref(),
                    *page_size,
                    *max_pages,
                    *timeout_secs,
                )
                .await
            }
            Commands::Count { operation, args } => self.count(operation, args.as_deref()).await,
            Commands::Exists { operation, args } => self.exists(operation, args.as_deref()).await,
            Commands::Validate => self.validate(),
        }
    }

    /// Load the client config from the config file or the endpoint flag
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match (&self.cli.config, &self.cli.endpoint) {
            (Some(path), _) => ClientConfig::from_file(path)?,
            (None, Some(endpoint)) => {
                let mut config = ClientConfig::new(endpoint);
                config.apply_env();
                config
            }
            (None, None) => {
                return Err(Error::config(
                    "No endpoint configured (use -C <file> or --endpoint <url>)",
                ))
            }
        };

        if let Some(vserver) = &self.cli.vserver {
            config.vserver = Some(vserver.clone());
        }
        config.validate()?;
        Ok(config)
    }

    /// Fetch every record of each operation, running operations concurrently
    async fn list(
        &self,
        operations: &[String],
        args: Option<&str>,
        page_size: Option<u32>,
        max_pages: Option<usize>,
        timeout_secs: Option<u64>,
    ) -> Result<()> {
        let config = self.load_config()?;
        let client = ArrayClient::new(&config)?;
        let arguments = parse_arguments(args)?;

        let mut options = *client.options();
        if let Some(page_size) = page_size {
            options = options.with_page_size(page_size);
        }
        if let Some(max_pages) = max_pages {
            options = options.with_max_pages(max_pages);
        }
        if let Some(timeout_secs) = timeout_secs {
            options = options.with_timeout(Duration::from_secs(timeout_secs));
        }

        let listings = operations.iter().map(|operation| {
            let client = &client;
            let arguments = &arguments;
            async move {
                let result = client
                    .list_with(operation, arguments, options)
                    .await
                    .with_context(|| format!("Listing '{operation}' failed"))?;
                Ok::<_, Error>((operation, result))
            }
        });

        for (operation, result) in try_join_all(listings).await? {
            info!(
                operation = operation.as_str(),
                num_records = result.num_records,
                "Listing complete"
            );
            self.output(&serde_json::to_value(&result)?);
        }

        Ok(())
    }

    /// Print the total record count of an operation
    async fn count(&self, operation: &str, args: Option<&str>) -> Result<()> {
        let config = self.load_config()?;
        let client = ArrayClient::new(&config)?;
        let arguments = parse_arguments(args)?;

        let num_records = client.record_count(operation, &arguments).await?;
        self.output(&json!({
            "operation": operation,
            "num-records": num_records,
        }));
        Ok(())
    }

    /// Print whether an operation matches any record
    async fn exists(&self, operation: &str, args: Option<&str>) -> Result<()> {
        let config = self.load_config()?;
        let client = ArrayClient::new(&config)?;
        let arguments = parse_arguments(args)?;

        let has_records = client.has_records(operation, &arguments).await?;
        self.output(&json!({
            "operation": operation,
            "has-records": has_records,
        }));
        Ok(())
    }

    /// Validate the client config
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;

        self.output(&json!({
            "valid": true,
            "endpoint": config.endpoint,
            "vserver": config.vserver,
            "page_size": config.listing.page_size,
            "max_pages": config.listing.max_pages,
        }));
        Ok(())
    }

    /// Output a document
    fn output(&self, doc: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(doc).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(doc).unwrap_or_default());
            }
        }
    }
}

/// Parse `--args` into call arguments; absent means no arguments
fn parse_arguments(args: Option<&str>) -> Result<Arguments> {
    let Some(raw) = args else {
        return Ok(Arguments::new());
    };

    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::invalid_value(
            "args",
            format!("expected a JSON object, got {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_arguments() {
        assert!(parse_arguments(None).unwrap().is_empty());

        let args = parse_arguments(Some(r#"{"query": {"lun-info": {"volume": "vol1"}}}"#)).unwrap();
        assert_eq!(args["query"]["lun-info"]["volume"], "vol1");

        assert!(matches!(
            parse_arguments(Some("[1, 2]")),
            Err(Error::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            parse_arguments(Some("{not json")),
            Err(Error::JsonParse(_))
        ));
    }

    #[test]
    fn test_cli_parses_list() {
        let cli = Cli::parse_from([
            "storagelist",
            "--endpoint",
            "https://cluster1/api",
            "list",
            "-o",
            "lun-get-iter",
            "-o",
            "volume-get-iter",
            "--page-size",
            "100",
        ]);

        match cli.command {
            Commands::List {
                operation,
                page_size,
                ..
            } => {
                assert_eq!(operation, vec!["lun-get-iter", "volume-get-iter"]);
                assert_eq!(page_size, Some(100));
            }
            other => panic!("Expected List, got {other:?}"),
        }
    }

    #[test]
    fn test_load_config_requires_endpoint() {
        let runner = Runner::new(Cli::parse_from(["storagelist", "validate"]));
        assert!(matches!(runner.load_config(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_vserver_override() {
        let runner = Runner::new(Cli::parse_from([
            "storagelist",
            "--endpoint",
            "https://cluster1/api",
            "--vserver",
            "openstack",
            "validate",
        ]));

        let config = runner.load_config().unwrap();
        assert_eq!(config.endpoint, "https://cluster1/api");
        assert_eq!(config.vserver.as_deref(), Some("openstack"));
    }
}
