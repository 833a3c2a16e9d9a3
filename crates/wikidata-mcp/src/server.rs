use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ListToolsResult, PaginatedRequestParams,
    ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData, ServerHandler};
use wikidata::WikidataClient;

use crate::dispatch::Dispatcher;

/// MCP handler over the Wikidata tool catalog.
///
/// Tool calls never surface as protocol errors: unknown tools, bad arguments,
/// and upstream failures all come back as a text block with `is_error` set.
#[derive(Clone)]
pub struct WikidataMcp {
    dispatcher: Dispatcher,
}

impl WikidataMcp {
    pub fn new(client: WikidataClient) -> Self {
        Self {
            dispatcher: Dispatcher::new(client),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn tools(&self) -> Vec<Tool> {
        self.dispatcher
            .registry()
            .list_tools()
            .into_iter()
            .map(|def| Tool::new(def.name, def.description, def.input_schema))
            .collect()
    }
}

impl ServerHandler for WikidataMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: rmcp::model::Implementation {
                name: "wikidata-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MCP server for querying Wikidata. Provides tools to search entities \
                 by label, fetch entity records (raw or simplified), run SPARQL \
                 queries against the Wikidata Query Service, list an entity's \
                 direct-claim relations, and find items by an exact property value."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .dispatcher
            .call_tool(&request.name, request.arguments)
            .await;
        let content = vec![Content::text(result.text)];
        Ok(if result.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        })
    }
}
