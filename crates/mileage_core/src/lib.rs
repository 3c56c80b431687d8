//! Core record store for the Mileage app.
//! Maps typed records to locator-addressed rows, validates them and writes
//! them back through a resolver.

pub mod dao;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use dao::engine::{save, validate, DaoError, DaoResult, ValidationError};
pub use dao::mapper::{from_row, from_values, load, LoadReport, MapError, MapResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::descriptor::{
    FieldAccessError, FieldDescriptor, FieldGetter, FieldSetter, MessageId, ValidationRule,
};
pub use model::record::{Record, ID_COLUMN};
pub use model::registry::{FieldRegistry, MetadataError, RegistryCell};
pub use model::value::{FieldValue, SemanticType};
pub use service::record_service::RecordService;
pub use store::cursor::{CellError, MemoryCursor, RowCursor};
pub use store::locator::{Locator, LocatorError, CONTENT_AUTHORITY};
pub use store::resolver::{Resolver, ResolverError, ResolverResult};
pub use store::sqlite_resolver::SqliteResolver;
pub use store::write_set::WriteSet;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
