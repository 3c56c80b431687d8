#![allow(dead_code)]

use mileage_core::db::open_db_in_memory;
use mileage_core::{
    FieldAccessError, FieldDescriptor, FieldRegistry, FieldValue, Locator, MemoryCursor,
    MessageId, Record, RegistryCell, Resolver, ResolverError, ResolverResult, SemanticType,
    ValidationError, ValidationRule, WriteSet,
};
use rusqlite::Connection;
use std::cell::RefCell;

pub const SCHEMA: &str = "
CREATE TABLE vehicles (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    make TEXT,
    model TEXT,
    year INTEGER,
    default_units INTEGER
);
CREATE TABLE fillups (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_id INTEGER NOT NULL,
    date INTEGER,
    price REAL,
    volume REAL,
    odometer REAL,
    octane INTEGER,
    partial INTEGER,
    comment TEXT
);
CREATE TABLE expenses (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    amount REAL NOT NULL
);
";

pub const HOUR_MS: i64 = 60 * 60 * 1000;

pub fn open_with_schema() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn
}

pub fn now_ms() -> i64 {
    mileage_core::model::value::now_epoch_ms()
}

fn mismatch(column: &'static str, kind: SemanticType, value: &FieldValue) -> FieldAccessError {
    FieldAccessError::mismatch(column, kind, value)
}

// Two-field record used by the save scenarios.

pub const ERROR_NO_NAME: MessageId = MessageId("error_no_name");
pub const ERROR_INVALID_AMOUNT: MessageId = MessageId("error_invalid_amount");

static EXPENSE_FIELDS: RegistryCell<Expense> = RegistryCell::new();

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub amount: f64,
}

impl Expense {
    pub fn new(name: &str, amount: f64) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            amount,
        }
    }
}

impl Record for Expense {
    const PATH: &'static str = "expenses";

    fn registry() -> &'static FieldRegistry<Self> {
        EXPENSE_FIELDS.get_or_build(Self::PATH, || {
            vec![
                FieldDescriptor::new(
                    "name",
                    SemanticType::Text,
                    |e: &Expense| Some(FieldValue::Text(e.name.clone())),
                    |e: &mut Expense, value| match value {
                        FieldValue::Text(name) => {
                            e.name = name;
                            Ok(())
                        }
                        other => Err(mismatch("name", SemanticType::Text, &other)),
                    },
                )
                .validated(ERROR_NO_NAME, &[ValidationRule::RequiredNonEmpty]),
                FieldDescriptor::new(
                    "amount",
                    SemanticType::Double,
                    |e: &Expense| Some(FieldValue::Double(e.amount)),
                    |e: &mut Expense, value| match value {
                        FieldValue::Double(amount) => {
                            e.amount = amount;
                            Ok(())
                        }
                        other => Err(mismatch("amount", SemanticType::Double, &other)),
                    },
                )
                .validated(ERROR_INVALID_AMOUNT, &[ValidationRule::PositiveNumber]),
            ]
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

// Text-heavy record with a cross-field pre-validation hook.

pub const ERROR_NO_TITLE: MessageId = MessageId("error_no_title");
pub const ERROR_MODEL_WITHOUT_MAKE: MessageId = MessageId("error_model_without_make");

static VEHICLE_FIELDS: RegistryCell<Vehicle> = RegistryCell::new();

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vehicle {
    pub id: i64,
    pub title: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub default_units: i32,
}

impl Record for Vehicle {
    const PATH: &'static str = "vehicles";

    fn registry() -> &'static FieldRegistry<Self> {
        VEHICLE_FIELDS.get_or_build(Self::PATH, || {
            vec![
                FieldDescriptor::new(
                    "title",
                    SemanticType::Text,
                    |v: &Vehicle| Some(FieldValue::Text(v.title.clone())),
                    |v: &mut Vehicle, value| match value {
                        FieldValue::Text(title) => {
                            v.title = title;
                            Ok(())
                        }
                        other => Err(mismatch("title", SemanticType::Text, &other)),
                    },
                )
                .validated(ERROR_NO_TITLE, &[ValidationRule::RequiredNonEmpty]),
                FieldDescriptor::new(
                    "make",
                    SemanticType::Text,
                    |v: &Vehicle| Some(FieldValue::Text(v.make.clone())),
                    |v: &mut Vehicle, value| match value {
                        FieldValue::Text(make) => {
                            v.make = make;
                            Ok(())
                        }
                        other => Err(mismatch("make", SemanticType::Text, &other)),
                    },
                ),
                FieldDescriptor::new(
                    "model",
                    SemanticType::Text,
                    |v: &Vehicle| Some(FieldValue::Text(v.model.clone())),
                    |v: &mut Vehicle, value| match value {
                        FieldValue::Text(model) => {
                            v.model = model;
                            Ok(())
                        }
                        other => Err(mismatch("model", SemanticType::Text, &other)),
                    },
                ),
                FieldDescriptor::new(
                    "year",
                    SemanticType::Integer,
                    |v: &Vehicle| Some(FieldValue::Integer(v.year)),
                    |v: &mut Vehicle, value| match value {
                        FieldValue::Integer(year) => {
                            v.year = year;
                            Ok(())
                        }
                        other => Err(mismatch("year", SemanticType::Integer, &other)),
                    },
                ),
                FieldDescriptor::new(
                    "default_units",
                    SemanticType::Integer,
                    |v: &Vehicle| Some(FieldValue::Integer(v.default_units)),
                    |v: &mut Vehicle, value| match value {
                        FieldValue::Integer(units) => {
                            v.default_units = units;
                            Ok(())
                        }
                        other => Err(mismatch("default_units", SemanticType::Integer, &other)),
                    },
                )
                .with_default(FieldValue::Integer(1)),
            ]
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn pre_validate(&self) -> Result<(), ValidationError> {
        if self.make.is_empty() && !self.model.is_empty() {
            return Err(ValidationError::custom("make", ERROR_MODEL_WITHOUT_MAKE));
        }
        Ok(())
    }
}

// Covers every semantic type.

pub const ERROR_NO_VEHICLE: MessageId = MessageId("error_no_vehicle");
pub const ERROR_FUTURE_DATE: MessageId = MessageId("error_future_date");
pub const ERROR_INVALID_PRICE: MessageId = MessageId("error_invalid_price");
pub const ERROR_INVALID_VOLUME: MessageId = MessageId("error_invalid_volume");
pub const ERROR_INVALID_ODOMETER: MessageId = MessageId("error_invalid_odometer");
pub const ERROR_INVALID_OCTANE: MessageId = MessageId("error_invalid_octane");

static FILLUP_FIELDS: RegistryCell<FillUp> = RegistryCell::new();

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillUp {
    pub id: i64,
    pub vehicle_id: i64,
    pub date: i64,
    pub price: f64,
    pub volume: f64,
    pub odometer: f64,
    pub octane: i32,
    pub partial: bool,
    pub comment: String,
}

impl FillUp {
    /// A fill-up that passes every rule.
    pub fn valid(vehicle_id: i64) -> Self {
        Self {
            id: 0,
            vehicle_id,
            date: now_ms() - HOUR_MS,
            price: 3.199,
            volume: 11.5,
            odometer: 48_211.4,
            octane: 91,
            partial: true,
            comment: "highway trip".to_string(),
        }
    }
}

impl Record for FillUp {
    const PATH: &'static str = "fillups";

    fn registry() -> &'static FieldRegistry<Self> {
        FILLUP_FIELDS.get_or_build(Self::PATH, || {
            vec![
                FieldDescriptor::new(
                    "vehicle_id",
                    SemanticType::Long,
                    |f: &FillUp| Some(FieldValue::Long(f.vehicle_id)),
                    |f: &mut FillUp, value| match value {
                        FieldValue::Long(id) => {
                            f.vehicle_id = id;
                            Ok(())
                        }
                        other => Err(mismatch("vehicle_id", SemanticType::Long, &other)),
                    },
                )
                .validated(ERROR_NO_VEHICLE, &[ValidationRule::PositiveNumber]),
                FieldDescriptor::new(
                    "date",
                    SemanticType::Timestamp,
                    |f: &FillUp| Some(FieldValue::Timestamp(f.date)),
                    |f: &mut FillUp, value| match value {
                        FieldValue::Timestamp(date) => {
                            f.date = date;
                            Ok(())
                        }
                        other => Err(mismatch("date", SemanticType::Timestamp, &other)),
                    },
                )
                .validated(ERROR_FUTURE_DATE, &[ValidationRule::PastTimestamp]),
                FieldDescriptor::new(
                    "price",
                    SemanticType::Double,
                    |f: &FillUp| Some(FieldValue::Double(f.price)),
                    |f: &mut FillUp, value| match value {
                        FieldValue::Double(price) => {
                            f.price = price;
                            Ok(())
                        }
                        other => Err(mismatch("price", SemanticType::Double, &other)),
                    },
                )
                .validated(ERROR_INVALID_PRICE, &[ValidationRule::PositiveNumber]),
                FieldDescriptor::new(
                    "volume",
                    SemanticType::Double,
                    |f: &FillUp| Some(FieldValue::Double(f.volume)),
                    |f: &mut FillUp, value| match value {
                        FieldValue::Double(volume) => {
                            f.volume = volume;
                            Ok(())
                        }
                        other => Err(mismatch("volume", SemanticType::Double, &other)),
                    },
                )
                .validated(ERROR_INVALID_VOLUME, &[ValidationRule::PositiveNumber]),
                FieldDescriptor::new(
                    "odometer",
                    SemanticType::Double,
                    |f: &FillUp| Some(FieldValue::Double(f.odometer)),
                    |f: &mut FillUp, value| match value {
                        FieldValue::Double(odometer) => {
                            f.odometer = odometer;
                            Ok(())
                        }
                        other => Err(mismatch("odometer", SemanticType::Double, &other)),
                    },
                )
                .validated(ERROR_INVALID_ODOMETER, &[ValidationRule::PositiveNumber]),
                FieldDescriptor::new(
                    "octane",
                    SemanticType::Integer,
                    |f: &FillUp| Some(FieldValue::Integer(f.octane)),
                    |f: &mut FillUp, value| match value {
                        FieldValue::Integer(octane) => {
                            f.octane = octane;
                            Ok(())
                        }
                        other => Err(mismatch("octane", SemanticType::Integer, &other)),
                    },
                )
                .with_default(FieldValue::Integer(87))
                .validated(ERROR_INVALID_OCTANE, &[ValidationRule::PositiveNumber]),
                FieldDescriptor::new(
                    "partial",
                    SemanticType::Boolean,
                    |f: &FillUp| Some(FieldValue::Boolean(f.partial)),
                    |f: &mut FillUp, value| match value {
                        FieldValue::Boolean(partial) => {
                            f.partial = partial;
                            Ok(())
                        }
                        other => Err(mismatch("partial", SemanticType::Boolean, &other)),
                    },
                )
                .with_default(FieldValue::Boolean(true)),
                FieldDescriptor::new(
                    "comment",
                    SemanticType::Text,
                    |f: &FillUp| Some(FieldValue::Text(f.comment.clone())),
                    |f: &mut FillUp, value| match value {
                        FieldValue::Text(comment) => {
                            f.comment = comment;
                            Ok(())
                        }
                        other => Err(mismatch("comment", SemanticType::Text, &other)),
                    },
                ),
            ]
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

// Optional fields, for required-non-null checks and mutator failures.
pub const ERROR_NO_LABEL: MessageId = MessageId("error_no_label");
pub const ERROR_FUTURE_LOG: MessageId = MessageId("error_future_log");
pub const MAX_LABEL_CHARS: usize = 32;

static REMINDER_FIELDS: RegistryCell<Reminder> = RegistryCell::new();

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reminder {
    pub id: i64,
    pub label: Option<String>,
    pub logged_at: i64,
    pub note: Option<String>,
}

impl Record for Reminder {
    const PATH: &'static str = "reminders";

    fn registry() -> &'static FieldRegistry<Self> {
        REMINDER_FIELDS.get_or_build(Self::PATH, || {
            vec![
                FieldDescriptor::new(
                    "label",
                    SemanticType::Text,
                    |r: &Reminder| r.label.clone().map(FieldValue::Text),
                    |r: &mut Reminder, value| match value {
                        FieldValue::Text(label) if label.chars().count() > MAX_LABEL_CHARS => {
                            Err(FieldAccessError::Rejected {
                                column: "label",
                                reason: format!("longer than {MAX_LABEL_CHARS} chars"),
                            })
                        }
                        FieldValue::Text(label) => {
                            r.label = Some(label);
                            Ok(())
                        }
                        other => Err(mismatch("label", SemanticType::Text, &other)),
                    },
                )
                .validated(
                    ERROR_NO_LABEL,
                    &[
                        ValidationRule::RequiredNonNull,
                        ValidationRule::RequiredNonEmpty,
                    ],
                ),
                FieldDescriptor::new(
                    "logged_at",
                    SemanticType::Long,
                    |r: &Reminder| Some(FieldValue::Long(r.logged_at)),
                    |r: &mut Reminder, value| match value {
                        FieldValue::Long(logged_at) => {
                            r.logged_at = logged_at;
                            Ok(())
                        }
                        other => Err(mismatch("logged_at", SemanticType::Long, &other)),
                    },
                )
                .validated(ERROR_FUTURE_LOG, &[ValidationRule::PastTimestamp]),
                FieldDescriptor::new(
                    "note",
                    SemanticType::Text,
                    |r: &Reminder| r.note.clone().map(FieldValue::Text),
                    |r: &mut Reminder, value| match value {
                        FieldValue::Text(note) => {
                            r.note = Some(note);
                            Ok(())
                        }
                        other => Err(mismatch("note", SemanticType::Text, &other)),
                    },
                ),
            ]
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Resolver double that records every call.
#[derive(Default)]
pub struct RecordingResolver {
    pub inserts: RefCell<Vec<(Locator, WriteSet)>>,
    pub updates: RefCell<Vec<(Locator, WriteSet)>>,
    pub next_id: i64,
    pub fail_writes: bool,
    /// Returned from `insert` instead of `<collection>/<next_id>` when set.
    pub insert_result: Option<Locator>,
}

impl RecordingResolver {
    pub fn returning_id(next_id: i64) -> Self {
        Self {
            next_id,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.borrow().len()
    }

    pub fn update_count(&self) -> usize {
        self.updates.borrow().len()
    }
}

impl Resolver for RecordingResolver {
    type Cursor = MemoryCursor;

    fn query(&self, _locator: &Locator) -> ResolverResult<MemoryCursor> {
        Ok(MemoryCursor::new(["_id"]))
    }

    fn insert(&self, locator: &Locator, values: &WriteSet) -> ResolverResult<Locator> {
        self.inserts
            .borrow_mut()
            .push((locator.clone(), values.clone()));
        if self.fail_writes {
            return Err(ResolverError::from(rusqlite::Error::InvalidQuery));
        }
        if let Some(result) = &self.insert_result {
            return Ok(result.clone());
        }
        Ok(locator.clone().with_appended_id(self.next_id))
    }

    fn update(&self, locator: &Locator, values: &WriteSet) -> ResolverResult<bool> {
        self.updates
            .borrow_mut()
            .push((locator.clone(), values.clone()));
        if self.fail_writes {
            return Err(ResolverError::from(rusqlite::Error::InvalidQuery));
        }
        Ok(true)
    }
}
