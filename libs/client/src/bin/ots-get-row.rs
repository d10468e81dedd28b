//! `ots-get-row`: read one row and print it as JSON
//!
//! Connection settings come from `--config` and/or `TABLESTORE_*`
//! environment variables.

use anyhow::{Context, Result};
use base64::Engine;
use clap::Parser;
use std::path::PathBuf;
use tablestore_client::{
    load_config, GetRowRequest, PrimaryKeyItem, PrimaryKeyValue, TablestoreClient, TimeRange,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Read one Tablestore row by primary key", long_about = None)]
struct Args {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Table name
    #[arg(short, long)]
    table: String,

    /// Primary key column as name:type:value, in key order.
    /// Types: integer, string, blob (base64), inf_min, inf_max
    #[arg(long = "pk", required = true, value_parser = parse_key_item)]
    primary_key: Vec<PrimaryKeyItem>,

    /// Columns to return (comma separated); all columns when omitted
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Versions to return per column
    #[arg(long)]
    max_versions: Option<u32>,

    /// Lower version bound in ms (inclusive)
    #[arg(long, conflicts_with = "specific_time")]
    start_time: Option<i64>,

    /// Upper version bound in ms (exclusive)
    #[arg(long, conflicts_with = "specific_time")]
    end_time: Option<i64>,

    /// Exact version timestamp in ms
    #[arg(long)]
    specific_time: Option<i64>,
}

impl Args {
    fn time_range(&self) -> Option<TimeRange> {
        if self.start_time.is_none() && self.end_time.is_none() && self.specific_time.is_none() {
            return None;
        }
        Some(TimeRange {
            start_time: self.start_time,
            end_time: self.end_time,
            specific_time: self.specific_time,
        })
    }

    fn to_request(&self) -> GetRowRequest {
        let mut request = GetRowRequest::new(&self.table, self.primary_key.clone())
            .columns(self.columns.iter().filter(|c| !c.is_empty()).cloned());
        request.max_versions = self.max_versions;
        request.time_range = self.time_range();
        request
    }
}

fn parse_key_item(arg: &str) -> Result<PrimaryKeyItem, String> {
    let mut parts = arg.splitn(3, ':');
    let name = parts.next().unwrap_or_default();
    let kind = parts
        .next()
        .ok_or_else(|| format!("expected name:type[:value], got '{arg}'"))?;
    let raw = parts.next();

    if name.is_empty() {
        return Err(format!("missing column name in '{arg}'"));
    }

    let value = match (kind, raw) {
        ("inf_min", None) => PrimaryKeyValue::InfMin,
        ("inf_max", None) => PrimaryKeyValue::InfMax,
        ("integer", Some(raw)) => raw
            .parse::<i64>()
            .map(PrimaryKeyValue::Integer)
            .map_err(|e| format!("invalid integer '{raw}' for {name}: {e}"))?,
        ("string", Some(raw)) => PrimaryKeyValue::String(raw.to_string()),
        ("blob", Some(raw)) => base64::engine::general_purpose::STANDARD
            .decode(raw)
            .map(PrimaryKeyValue::Blob)
            .map_err(|e| format!("invalid base64 blob for {name}: {e}"))?,
        ("inf_min" | "inf_max", Some(_)) => {
            return Err(format!("{kind} takes no value in '{arg}'"));
        }
        ("integer" | "string" | "blob", None) => {
            return Err(format!("missing value for {name} in '{arg}'"));
        }
        (other, _) => return Err(format!("unknown key type '{other}'")),
    };

    Ok(PrimaryKeyItem::new(name, value))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablestore=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let client = TablestoreClient::new(&config)?;

    let request = args.to_request();
    info!(table = %request.table_name, key_cells = request.primary_key.len(), "Reading row");

    let response = client
        .get_row(&request)
        .await
        .with_context(|| format!("GetRow on '{}' failed", request.table_name))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
