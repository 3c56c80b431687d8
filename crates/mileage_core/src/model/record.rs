//! Record contract shared by every mapped domain type.
//!
//! # Responsibility
//! - Expose identity, base path and descriptor registry of a record type.
//! - Provide the cross-field pre-validation hook.
//!
//! # Invariants
//! - `id <= 0` is transient, `id > 0` is persisted.
//! - The identity lives in `_id` and is never part of the descriptor table.

use super::registry::FieldRegistry;
use crate::dao::engine::ValidationError;
use crate::store::locator::Locator;

/// Identity column present on every mapped table.
pub const ID_COLUMN: &str = "_id";

/// A typed object mapped to one row of persistent storage.
///
/// Implementors declare their descriptor table once, usually through a
/// `static` [`RegistryCell`](super::registry::RegistryCell):
///
/// ```ignore
/// static FIELDS: RegistryCell<Vehicle> = RegistryCell::new();
///
/// impl Record for Vehicle {
///     const PATH: &'static str = "vehicles";
///     fn registry() -> &'static FieldRegistry<Self> {
///         FIELDS.get_or_build("vehicles", vehicle_fields)
///     }
///     // ...
/// }
/// ```
pub trait Record: Default + Sized + 'static {
    /// Base locator segment, which is also the backing table name.
    const PATH: &'static str;

    fn registry() -> &'static FieldRegistry<Self>;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Type-specific checks run before generic rule evaluation.
    fn pre_validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Whether this record has a persisted identity.
    ///
    /// Implementors must not override this. `save` dispatches on `id() > 0`
    /// directly, so an override only changes what callers observe.
    fn is_existing_object(&self) -> bool {
        self.id() > 0
    }

    /// Locator of this record: the collection while transient, the single
    /// row once persisted. Implementors must not override this; `save`
    /// builds the same locator from `PATH` and `id()`.
    fn locator(&self) -> Locator {
        Locator::for_record(Self::PATH, self.id())
    }
}
