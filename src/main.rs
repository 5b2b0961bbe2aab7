// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Kqool CLI entrypoint.
//!
//! By default this starts a session from the configured catalogs and runs the `fzf` picker;
//! the picker's bindings call back into this binary with `--session <dir>` and one of the
//! session actions. Use `--mcp` (stdio) or `--mcp-http-port` to serve the session tools over MCP.

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing_subscriber::EnvFilter;

use kqool::config::{default_sources, load_catalogs, ConfigSource};
use kqool::format::{option_records, render_records};
use kqool::ops::{self, EngineError};
use kqool::store::{SessionFile, StoreError, WriteDurability};

const LOG_ENV: &str = "KQOOL_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <path|url>]... [--session <dir>] [--history <file>] [--durable-writes] [--verbose]\n  {program} --session <dir> (--options | --pick <token> | --undo | --query)\n  {program} [--config <path|url>]... [--session <dir>] --init\n  {program} [--config <path|url>]... --mcp\n  {program} [--config <path|url>]... --mcp-http-port <port>\n\nWithout --config, sources come from ${} (comma-separated) or ~/.kqool.yaml.\nThe default mode runs fzf and prints the composed query when it exits.\n--mcp serves MCP over stdio; --mcp-http-port serves streamable HTTP at `http://127.0.0.1:<port>/mcp`.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\nLogs go to stderr; filter with ${LOG_ENV} (default `warn`) or --verbose.",
        kqool::config::CONFIG_ENV
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum Action {
    /// Start a session and run the interactive picker.
    #[default]
    Run,
    Init,
    Options,
    Pick(String),
    Undo,
    Query,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    configs: Vec<String>,
    session_dir: Option<String>,
    history: Option<String>,
    action: Action,
    mcp: bool,
    mcp_http_port: Option<u16>,
    durable_writes: bool,
    verbose: bool,
}

fn set_action(options: &mut CliOptions, action: Action) -> Result<(), ()> {
    if options.action != Action::Run {
        return Err(());
    }
    options.action = action;
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => options.configs.push(args.next().ok_or(())?),
            "--session" => {
                if options.session_dir.is_some() {
                    return Err(());
                }
                options.session_dir = Some(args.next().ok_or(())?);
            }
            "--history" => {
                if options.history.is_some() {
                    return Err(());
                }
                options.history = Some(args.next().ok_or(())?);
            }
            "--init" => set_action(&mut options, Action::Init)?,
            "--options" => set_action(&mut options, Action::Options)?,
            "--pick" => {
                let token = args.next().ok_or(())?;
                set_action(&mut options, Action::Pick(token))?;
            }
            "--undo" => set_action(&mut options, Action::Undo)?,
            "--query" => set_action(&mut options, Action::Query)?,
            "--mcp" => {
                if options.mcp {
                    return Err(());
                }
                options.mcp = true;
            }
            "--mcp-http-port" => {
                if options.mcp_http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.mcp_http_port = Some(port);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--verbose" | "-v" => options.verbose = true,
            _ => return Err(()),
        }
    }

    let serves_mcp = options.mcp || options.mcp_http_port.is_some();
    if options.mcp && options.mcp_http_port.is_some() {
        return Err(());
    }
    if serves_mcp && (options.action != Action::Run || options.session_dir.is_some()) {
        return Err(());
    }

    let needs_session =
        matches!(options.action, Action::Options | Action::Pick(_) | Action::Undo | Action::Query);
    if needs_session && options.session_dir.is_none() {
        return Err(());
    }

    Ok(options)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_sources(configs: &[String]) -> Vec<ConfigSource> {
    if configs.is_empty() {
        default_sources()
    } else {
        configs.iter().map(|raw| ConfigSource::parse(raw)).collect()
    }
}

fn print_records(
    out: &mut impl Write,
    entries: &[kqool::compose::OptionEntry],
) -> std::io::Result<()> {
    out.write_all(render_records(&option_records(entries)).as_bytes())?;
    out.flush()
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "kqool".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        init_tracing(options.verbose);

        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };

        if options.mcp {
            let mcp = kqool::mcp::KqoolMcp::new(resolve_sources(&options.configs))
                .with_durability(durability);
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(mcp.serve_stdio())?;
            return Ok(());
        }

        if let Some(mcp_http_port) = options.mcp_http_port {
            let mcp = kqool::mcp::KqoolMcp::new(resolve_sources(&options.configs))
                .with_durability(durability);
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind(("127.0.0.1", mcp_http_port)).await?;
                tracing::info!(addr = %listener.local_addr()?, "serving MCP over HTTP at /mcp");

                let config = StreamableHttpServerConfig {
                    stateful_mode: true,
                    ..StreamableHttpServerConfig::default()
                };
                let session_manager = Arc::new(LocalSessionManager::default());
                let mcp_service =
                    StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);

                let router = Router::new().nest_service("/mcp", mcp_service);
                axum::serve(listener, router).await?;
                Ok::<(), Box<dyn Error>>(())
            })?;
            return Ok(());
        }

        let session_file = || -> Result<SessionFile, StoreError> {
            let file = match &options.session_dir {
                Some(dir) => SessionFile::new(dir),
                None => SessionFile::create_in_temp_dir()?,
            };
            Ok(file.with_durability(durability))
        };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        match &options.action {
            Action::Run => {
                let catalogs = load_catalogs(&resolve_sources(&options.configs))?;
                let (file, initial) = ops::init_session(session_file()?, catalogs)?;
                let exe = std::env::current_exe()?;
                let records = render_records(&option_records(&initial));
                let status = kqool::host::run_picker(&exe, &file, &records)?;
                tracing::debug!(?status, session = %file.root().display(), "picker finished");

                let history = options.history.as_ref().map(PathBuf::from);
                kqool::host::finish(&file, history.as_deref(), &mut out)?;
            }
            Action::Init => {
                let catalogs = load_catalogs(&resolve_sources(&options.configs))?;
                let (file, _) = ops::init_session(session_file()?, catalogs)?;
                writeln!(out, "{}", file.root().display())?;
            }
            Action::Options => print_records(&mut out, &ops::options(&session_file()?)?)?,
            Action::Pick(token) => print_records(&mut out, &ops::pick(&session_file()?, token)?)?,
            Action::Undo => print_records(&mut out, &ops::undo(&session_file()?)?.options)?,
            Action::Query => match ops::current_query(&session_file()?) {
                Ok(query) => writeln!(out, "{query}")?,
                Err(EngineError::NoSelection) => {}
                Err(err) => return Err(err.into()),
            },
        }

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("kqool: {err}");
        std::process::exit(1);
    }
}
