pub mod dispatch;
pub mod params;
pub mod registry;
pub mod server;

pub use dispatch::{DispatchError, Dispatcher, ToolCall, ToolCallResult};
pub use registry::{ToolDefinition, ToolRegistry};
pub use server::WikidataMcp;
