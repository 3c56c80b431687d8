//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `mileage_core` linkage.
//! - Save and reload one record through the generic engine.

use mileage_core::db::open_db_in_memory;
use mileage_core::{
    FieldAccessError, FieldDescriptor, FieldRegistry, FieldValue, MessageId, Record,
    RecordService, RegistryCell, SemanticType, SqliteResolver, ValidationRule,
};
use std::process::ExitCode;

const VEHICLES_SCHEMA: &str = "CREATE TABLE vehicles (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    year INTEGER
);";

static VEHICLE_FIELDS: RegistryCell<Vehicle> = RegistryCell::new();

#[derive(Debug, Default)]
struct Vehicle {
    id: i64,
    title: String,
    year: i32,
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
                        other => Err(FieldAccessError::mismatch(
                            "title",
                            SemanticType::Text,
                            &other,
                        )),
                    },
                )
                .validated(
                    MessageId("error_no_title"),
                    &[ValidationRule::RequiredNonEmpty],
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
                        other => Err(FieldAccessError::mismatch(
                            "year",
                            SemanticType::Integer,
                            &other,
                        )),
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

fn main() -> ExitCode {
    println!("mileage_core ping={}", mileage_core::ping());
    println!("mileage_core version={}", mileage_core::core_version());

    match save_and_reload() {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("mileage_cli smoke failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn save_and_reload() -> Result<String, Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    conn.execute_batch(VEHICLES_SCHEMA)?;
    let service = RecordService::new(SqliteResolver::new(&conn));

    let mut vehicle = Vehicle {
        title: "Smoke test".to_string(),
        year: 2009,
        ..Vehicle::default()
    };
    service.save(&mut vehicle)?;

    let loaded: Vehicle = service
        .find(vehicle.id())?
        .ok_or("saved vehicle was not found")?;
    Ok(format!(
        "saved locator={} title={} year={}",
        loaded.locator(),
        loaded.title,
        loaded.year
    ))
}
