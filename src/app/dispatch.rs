use crate::cli::Commands;
use crate::config::ConfigHandle;
use crate::store::SqliteGraphStore;
use crate::versioning::{
    CheckMode, Decision, NodeType, Record, StoreSnapshot, UpdateGate, VERSION_CHECK_MODE,
    VERSION_KEY, hash_passport_key,
};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    decision: Decision,
    metadata: &'a Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct RejectionReport<'a> {
    error: &'a str,
    message: String,
}

fn build_record(
    id: String,
    object_type: String,
    node_type: &str,
    version_key: Option<String>,
    metadata: Option<&str>,
) -> Result<Record> {
    let mut record = Record::new(id, object_type, NodeType::from(node_type));
    if let Some(raw) = metadata {
        let parsed: Value = serde_json::from_str(raw).context("--metadata is not valid JSON")?;
        let Value::Object(object) = parsed else {
            bail!("--metadata must be a JSON object");
        };
        record.metadata.extend(object);
    }
    if let Some(key) = version_key {
        record.metadata.insert(VERSION_KEY.to_string(), Value::String(key));
    }
    Ok(record)
}

async fn open_store(config: &ConfigHandle) -> Result<Arc<SqliteGraphStore>> {
    let path = config.load().database_path();
    let store = SqliteGraphStore::open(&path)
        .await
        .with_context(|| format!("open graph store at {}", path.display()))?;
    Ok(Arc::new(store))
}

async fn run_validate(config: ConfigHandle, mut record: Record) -> Result<()> {
    let store = open_store(&config).await?;
    let gate = UpdateGate::from_config(store.clone(), store, config);

    match gate.validate(&mut record, None).await {
        Ok(decision) => {
            let metadata: Map<String, Value> = record.metadata.into_iter().collect();
            let report = ValidationReport {
                decision,
                metadata: &metadata,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(err) => {
            let report = RejectionReport {
                error: err.code(),
                message: err.to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Err(err).context("update rejected")
        }
    }
}

pub async fn dispatch(command: Commands, config: ConfigHandle) -> Result<()> {
    match command {
        Commands::Validate {
            id,
            object_type,
            node_type,
            version_key,
            metadata,
        } => {
            let record = build_record(id, object_type, &node_type, version_key, metadata.as_deref())?;
            run_validate(config, record).await
        }

        Commands::PutNode {
            id,
            object_type,
            node_type,
            last_updated_on,
            version_key,
        } => {
            let store = open_store(&config).await?;
            let snapshot = StoreSnapshot {
                last_updated_on: Some(last_updated_on),
                version_key,
            };
            store
                .upsert_node(&id, &object_type, &NodeType::from(node_type), &snapshot)
                .await?;
            info!(node_id = %id, %object_type, "node stored");
            Ok(())
        }

        Commands::SetMode { object_type, mode } => {
            let Some(parsed) = CheckMode::parse(&mode) else {
                bail!("unknown check mode {mode:?}; expected OFF, STRICT or LENIENT");
            };
            let store = open_store(&config).await?;
            store
                .set_config_value(&object_type, VERSION_CHECK_MODE, &parsed.to_string())
                .await?;
            info!(%object_type, mode = %parsed, "version check mode set");
            Ok(())
        }

        Commands::PassportHash { key } => {
            println!("{}", hash_passport_key(&key));
            Ok(())
        }

        Commands::Config => {
            let snapshot = config.load_full();
            println!(
                "{}",
                toml::to_string_pretty(snapshot.as_ref()).context("serialize config")?
            );
            Ok(())
        }
    }
}
