// SPDX-FileCopyrightText: 2026 The Kqool Authors
// SPDX-License-Identifier: LicenseRef-Kqool-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Kqool and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::compose::OptionEntry;
use crate::config::{load_catalogs, ConfigSource};
use crate::format::encode_option;
use crate::ops::{self, EngineError};
use crate::store::{SessionFile, StoreError, WriteDurability};

use super::types::*;

#[derive(Clone)]
pub struct KqoolMcp {
    default_sources: Arc<Vec<ConfigSource>>,
    durability: WriteDurability,
    // Serializes session operations; state itself is re-read from disk on every call.
    lock: Arc<Mutex<()>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl KqoolMcp {
    /// `default_sources` are used by `session.init` when the caller passes none.
    pub fn new(default_sources: Vec<ConfigSource>) -> Self {
        Self {
            default_sources: Arc::new(default_sources),
            durability: WriteDurability::default(),
            lock: Arc::new(Mutex::new(())),
            tool_router: Self::tool_router(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    fn session_file(&self, session: &str) -> Result<SessionFile, ErrorData> {
        if session.trim().is_empty() {
            return Err(ErrorData::invalid_params("session must not be empty", None));
        }
        Ok(SessionFile::new(session).with_durability(self.durability))
    }

    /// Start a session from catalog sources and return the initial options.
    #[tool(name = "session.init")]
    async fn session_init(
        &self,
        params: Parameters<SessionInitParams>,
    ) -> Result<Json<SessionOptionsResponse>, ErrorData> {
        let SessionInitParams { sources, session } = params.0;
        let sources = if sources.is_empty() {
            self.default_sources.as_ref().clone()
        } else {
            sources.iter().map(|raw| ConfigSource::parse(raw)).collect()
        };

        // Remote sources use a blocking client; keep it off the async workers.
        let catalogs = tokio::task::spawn_blocking(move || load_catalogs(&sources))
            .await
            .map_err(|err| {
                ErrorData::internal_error(format!("catalog loading task failed: {err}"), None)
            })?
            .map_err(|err| engine_error(err.into()))?;

        let file = match session {
            Some(session) => self.session_file(&session)?,
            None => SessionFile::create_in_temp_dir()
                .map_err(|err| engine_error(err.into()))?
                .with_durability(self.durability),
        };

        let _guard = self.lock.lock().await;
        let (file, options) = ops::init_session(file, catalogs).map_err(engine_error)?;
        Ok(Json(SessionOptionsResponse {
            session: session_ref(&file),
            options: mcp_options(&options),
        }))
    }

    /// Options currently available in the session.
    #[tool(name = "session.options")]
    async fn session_options(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<SessionOptionsResponse>, ErrorData> {
        let file = self.session_file(&params.0.session)?;
        let _guard = self.lock.lock().await;
        let options = ops::options(&file).map_err(engine_error)?;
        Ok(Json(SessionOptionsResponse {
            session: session_ref(&file),
            options: mcp_options(&options),
        }))
    }

    /// Select the option behind `token` and return the recomputed options.
    #[tool(name = "session.pick")]
    async fn session_pick(
        &self,
        params: Parameters<SessionPickParams>,
    ) -> Result<Json<SessionOptionsResponse>, ErrorData> {
        let SessionPickParams { session, token } = params.0;
        let file = self.session_file(&session)?;
        let _guard = self.lock.lock().await;
        let options = ops::pick(&file, &token).map_err(engine_error)?;
        Ok(Json(SessionOptionsResponse {
            session: session_ref(&file),
            options: mcp_options(&options),
        }))
    }

    /// Drop the latest selection; a no-op when nothing is selected.
    #[tool(name = "session.undo")]
    async fn session_undo(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<SessionUndoResponse>, ErrorData> {
        let file = self.session_file(&params.0.session)?;
        let _guard = self.lock.lock().await;
        let undo = ops::undo(&file).map_err(engine_error)?;
        Ok(Json(SessionUndoResponse {
            session: session_ref(&file),
            options: mcp_options(&undo.options),
            undone: undo.removed.map(|selection| selection.query().to_owned()),
        }))
    }

    /// The composed query so far.
    #[tool(name = "session.query")]
    async fn session_query(
        &self,
        params: Parameters<SessionParams>,
    ) -> Result<Json<SessionQueryResponse>, ErrorData> {
        let file = self.session_file(&params.0.session)?;
        let _guard = self.lock.lock().await;
        let state = file.load_state().map_err(|err| engine_error(err.into()))?;
        Ok(Json(SessionQueryResponse {
            session: session_ref(&file),
            query: ops::compose_query(state.selections()),
            selections: state.selections().len() as u64,
        }))
    }
}

#[tool_handler]
impl ServerHandler for KqoolMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Kqool query composition server (tools: session.init, session.options, session.pick, session.undo, session.query). Pass the `session` returned by session.init to every other tool."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn session_ref(file: &SessionFile) -> String {
    file.root().to_string_lossy().into_owned()
}

fn mcp_options(options: &[OptionEntry]) -> Vec<McpOption> {
    options
        .iter()
        .map(|entry| McpOption {
            query: entry.display().to_owned(),
            token: encode_option(entry.option()),
        })
        .collect()
}

fn engine_error(err: EngineError) -> ErrorData {
    debug!(error = %err, "session tool failed");
    match &err {
        EngineError::Config(_) | EngineError::Decode(_) => {
            ErrorData::invalid_params(err.to_string(), None)
        }
        EngineError::Store(StoreError::MissingSession { .. }) => {
            ErrorData::resource_not_found(err.to_string(), None)
        }
        EngineError::NoSelection => ErrorData::invalid_request(err.to_string(), None),
        EngineError::Store(_) => ErrorData::internal_error(err.to_string(), None),
    }
}
