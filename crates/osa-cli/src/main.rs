//! 🚀 osa-cli — the front door, the bouncer, the maitre d' of osa.
//!
//! 🎬 *[narrator voice]* "It all started with a simple main() function..."
//! 📦 This binary crate is the thin CLI wrapper that loads config, sets up logging,
//! turns one subcommand into one action call, and prints whatever the cluster said.
//! Like a manager. 🦆

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use serde_json::Value;
use tracing::error;
use tracing_subscriber::EnvFilter;

use osa::{ActionCall, AppConfig, NormalizedResponse, ResponseBody};

/// 🔎 Talk to an OpenSearch cluster, one action at a time.
#[derive(Debug, Parser)]
#[command(name = "osa", version, about)]
struct Cli {
    /// 📋 TOML config file. Env vars (OSA_*) are always read; the file wins on conflicts.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// 📡 Cluster base URL. https:// is assumed when no scheme is given.
    #[arg(long)]
    base_url: Option<String>,
    /// 🪪 Client certificate: inline PEM or a file store reference.
    #[arg(long)]
    client_cert: Option<String>,
    /// 🔑 Client key: inline PEM or a file store reference.
    #[arg(long)]
    client_key: Option<String>,
    /// 📜 CA certificate: inline PEM or a file store reference.
    #[arg(long)]
    ca_cert: Option<String>,
    /// 🛡️ Verify the server certificate (true/false/yes/no/1/0).
    #[arg(long)]
    verify: Option<String>,
    /// ⏱️ Request timeout in seconds.
    #[arg(long)]
    timeout: Option<String>,
    /// 🍽️ Print a summary table instead of the raw JSON envelope.
    #[arg(long)]
    table: bool,
    #[command(subcommand)]
    command: Command,
}

/// 🎯 One subcommand per action. Bodies accept JSON, literal dicts, raw text, or `@path`.
#[derive(Debug, Subcommand)]
#[command(rename_all = "snake_case")]
enum Command {
    ClusterHealth,
    ListIndices,
    GetIndex {
        index: String,
    },
    CreateIndex {
        index: String,
        #[arg(long)]
        body: Option<String>,
    },
    DeleteIndex {
        index: String,
    },
    IndexDocument {
        index: String,
        document_id: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        refresh: Option<String>,
    },
    CreateDocument {
        index: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        refresh: Option<String>,
    },
    GetDocument {
        index: String,
        document_id: String,
    },
    UpdateDocument {
        index: String,
        document_id: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        refresh: Option<String>,
    },
    DeleteDocument {
        index: String,
        document_id: String,
        #[arg(long)]
        refresh: Option<String>,
    },
    Search {
        index: String,
        #[arg(long)]
        query_body: Option<String>,
        #[arg(long = "q")]
        query_string: Option<String>,
    },
    Bulk {
        #[arg(long)]
        payload: Option<String>,
        #[arg(long)]
        refresh: Option<String>,
    },
    RawRequest {
        method: String,
        path: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        headers: Option<String>,
        #[arg(long)]
        params: Option<String>,
    },
}

/// 📂 `@path` means "read it from disk"; anything else is taken literally.
fn load_text(arg: Option<String>) -> Result<Option<Value>> {
    let Some(arg) = arg else {
        return Ok(None);
    };
    match arg.strip_prefix('@') {
        Some(path) => {
            let text = std::fs::read_to_string(path).context(format!(
                "💀 Couldn't read '{}'. The @ promised a file; the disk did not deliver.",
                path
            ))?;
            Ok(Some(Value::String(text)))
        }
        None => Ok(Some(Value::String(arg))),
    }
}

impl Command {
    fn into_call(self) -> Result<ActionCall> {
        let call = match self {
            Command::ClusterHealth => ActionCall::ClusterHealth,
            Command::ListIndices => ActionCall::ListIndices,
            Command::GetIndex { index } => ActionCall::GetIndex { index },
            Command::CreateIndex { index, body } => ActionCall::CreateIndex {
                index,
                body: load_text(body)?,
            },
            Command::DeleteIndex { index } => ActionCall::DeleteIndex { index },
            Command::IndexDocument { index, document_id, body, refresh } => {
                ActionCall::IndexDocument {
                    index,
                    document_id,
                    body: load_text(body)?,
                    refresh,
                }
            }
            Command::CreateDocument { index, body, refresh } => ActionCall::CreateDocument {
                index,
                body: load_text(body)?,
                refresh,
            },
            Command::GetDocument { index, document_id } => {
                ActionCall::GetDocument { index, document_id }
            }
            Command::UpdateDocument { index, document_id, body, refresh } => {
                ActionCall::UpdateDocument {
                    index,
                    document_id,
                    body: load_text(body)?,
                    refresh,
                }
            }
            Command::DeleteDocument { index, document_id, refresh } => {
                ActionCall::DeleteDocument { index, document_id, refresh }
            }
            Command::Search { index, query_body, query_string } => ActionCall::Search {
                index,
                query_body: load_text(query_body)?,
                query_string,
            },
            Command::Bulk { payload, refresh } => ActionCall::Bulk {
                payload: load_text(payload)?,
                refresh,
            },
            Command::RawRequest { method, path, body, headers, params } => ActionCall::RawRequest {
                method,
                path,
                body: load_text(body)?,
                headers: load_text(headers)?,
                params: load_text(params)?,
            },
        };
        Ok(call)
    }
}

impl Cli {
    /// 🔧 Flags beat config. Config beats env. Env beats nothing.
    fn apply_overrides(&self, app_config: &mut AppConfig) {
        let conn = &mut app_config.connection;
        if let Some(base_url) = &self.base_url {
            conn.base_url = base_url.clone();
        }
        if let Some(cert) = &self.client_cert {
            conn.client_cert = Some(cert.clone());
        }
        if let Some(key) = &self.client_key {
            conn.client_key = Some(key.clone());
        }
        if let Some(ca) = &self.ca_cert {
            conn.ca_cert = Some(ca.clone());
        }
        if let Some(verify) = &self.verify {
            conn.verify = Some(Value::String(verify.clone()));
        }
        if let Some(timeout) = &self.timeout {
            conn.timeout = Some(Value::String(timeout.clone()));
        }
    }
}

fn print_table(response: &NormalizedResponse) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["field", "value"]);
    table.add_row(vec!["status".to_string(), response.status.to_string()]);
    table.add_row(vec!["success".to_string(), response.success.to_string()]);
    table.add_row(vec!["url".to_string(), response.url.clone()]);
    for (name, value) in &response.headers {
        table.add_row(vec![format!("header: {name}"), value.clone()]);
    }
    println!("{table}");
    match &response.body {
        ResponseBody::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        ResponseBody::Text(text) => println!("{text}"),
    }
    Ok(())
}

/// 🚀 main() — where it all begins.
///
/// 🔧 Steps:
/// 1. Init tracing (to stderr, so stdout stays pipeable)
/// 2. Parse args
/// 3. Load config, then let flags override it
/// 4. Run the one action
/// 5. Print the envelope, exit non-zero if the cluster said no
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 🔒 Validate the config file exists before we get too emotionally attached
    if let Some(config_file) = &cli.config {
        let exists = config_file.try_exists().context(format!(
            "💀 Couldn't check whether the configuration file exists. Was checking here: '{}'",
            config_file.display()
        ))?;
        if !exists {
            anyhow::bail!(
                "💀 Configuration file '{}' does not exist. If it's a relative path, it's relative to \
                 the current directory, which may not be the directory you think it is.",
                config_file.display()
            );
        }
    }

    let mut app_config = osa::load_config(cli.config.as_deref())
        .context("💀 In osa-cli, main, we couldn't load the config. Take a look at the file and the OSA_* env vars.")?;
    cli.apply_overrides(&mut app_config);

    let table = cli.table;
    let call = cli.command.into_call()?;

    let response = match osa::run(&app_config, call).await {
        Ok(response) => response,
        Err(err) => {
            let err = anyhow::Error::new(err);
            error!("💀 error: {}", err);
            // -- 🧅 peel the onion of sadness, one layer at a time
            let mut the_vibes_are_giving_connection_issues = false;
            for cause in err.chain().skip(1) {
                error!("⚠️  cause: {}", cause);
                let cause_str = cause.to_string();
                if cause_str.contains("error sending request")
                    || cause_str.contains("onnection refused")
                    || cause_str.contains("tcp connect error")
                    || cause_str.contains("dns error")
                    || cause_str.contains("certificate")
                {
                    the_vibes_are_giving_connection_issues = true;
                }
            }
            if the_vibes_are_giving_connection_issues {
                error!(
                    "🔧 hint: the cluster isn't reachable, or the TLS handshake failed. \
                    Check the base URL and port, that the cluster is running, and that the \
                    client cert/key and CA match what the cluster expects. ☕"
                );
            }
            std::process::exit(1);
        }
    };

    if table {
        print_table(&response)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    // -- 📬 the cluster answered, just not with good news
    if !response.success {
        std::process::exit(2);
    }
    Ok(())
}
