// SheetMate Core Library - Platform-agnostic assistant logic
// Four-layer architecture: Util -> Infrastructure -> Workbook -> Session

pub mod infrastructure; // Infrastructure layer - AI clients, storage collaborators
pub mod schema; // Operation vocabulary, catalog renderings, wire format
pub mod session; // Chat turn orchestration and pending-batch handshake
pub mod util; // General types, errors
pub mod workbook; // Spreadsheet host, snapshot, context serializer, executor

// Export main types
pub use util::errors::{SheetMateError, SheetMateResult};
pub use util::types::{AssistantSettings, Message, MessageRole, ProviderKind};

// Export schema components
pub use schema::{Operation, PivotValueField};

// Export infrastructure components
pub use infrastructure::ai::{AIClient, ProviderAdapter, ProviderResponse};
pub use infrastructure::storage::{
    HistoryStore, InMemoryHistoryStore, InMemorySettingsStore, SettingsStore, HISTORY_CAP,
};

// Export workbook components
pub use workbook::{
    apply, build_context, serialize_context, ApplyReport, SimulatedWorkbook, SpreadsheetHost,
    WorkbookSnapshot,
};

// Export session components
pub use session::{ChatSession, TurnPhase};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CORE_NAME: &str = "SheetMate Core";
