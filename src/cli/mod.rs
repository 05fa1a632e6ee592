use clap::{Parser, Subcommand};

/// `versiongate` - optimistic-concurrency gate for graph node updates.
#[derive(Parser, Debug)]
#[command(name = "versiongate")]
#[command(version)]
#[command(about = "Version-key gate for graph node updates.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.versiongate/config.toml)
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether an update to a node may proceed
    Validate {
        /// Node identifier
        #[arg(long)]
        id: String,

        /// Object type whose definition holds the check mode
        #[arg(long)]
        object_type: String,

        /// Node type tag (DATA_NODE, DEFINITION_NODE, ...)
        #[arg(long, default_value = "DATA_NODE")]
        node_type: String,

        /// Version key sent by the client
        #[arg(long)]
        version_key: Option<String>,

        /// Additional update metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },

    /// Insert or replace a node's versioning properties
    PutNode {
        #[arg(long)]
        id: String,

        #[arg(long)]
        object_type: String,

        #[arg(long, default_value = "DATA_NODE")]
        node_type: String,

        /// lastUpdatedOn timestamp (RFC 3339 or yyyy-MM-ddTHH:mm:ss.SSS+hhmm)
        #[arg(long)]
        last_updated_on: String,

        /// Explicit stored version key
        #[arg(long)]
        version_key: Option<String>,
    },

    /// Set the version check mode of an object type (OFF, STRICT, LENIENT)
    SetMode {
        #[arg(long)]
        object_type: String,

        #[arg(long)]
        mode: String,
    },

    /// Print the SHA-256 digest to configure for a passport key
    PassportHash {
        /// Plaintext passport key
        key: String,
    },

    /// Print the effective configuration
    Config,
}
