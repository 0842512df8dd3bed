pub mod document;
pub mod export;
pub mod format;

pub use document::{build_document, build_header, build_network, write_header, write_network};
pub use export::{ExportStats, ModelSnapshot, OverwriteAction, build_context, export_model, read_snapshot};
pub use format::{ExportContext, MapUnit, NodeRecord, ReachRecord};
