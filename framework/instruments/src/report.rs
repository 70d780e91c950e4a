mod operations_table;

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tabled::settings::Style;
use tabled::Table;

use crate::OperationRecord;

pub use operations_table::OperationRow;

/// Keeps every operation in memory and prints a summary table at the end of the run.
///
/// Shared between the load driver and the dashboard, which record from different threads.
#[derive(Debug, Default)]
pub struct Reporter {
    operation_records: Mutex<Vec<OperationRecord>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_operation(&self, operation_record: OperationRecord) {
        self.operation_records.lock().push(operation_record);
    }

    pub fn records(&self) -> Vec<OperationRecord> {
        self.operation_records.lock().clone()
    }

    /// One row per operation id, sorted by id.
    pub fn summarize(&self) -> Vec<OperationRow> {
        let records = self.operation_records.lock();

        records
            .iter()
            .fold(BTreeMap::<&str, Vec<&OperationRecord>>::new(), |mut acc, record| {
                acc.entry(record.operation_id()).or_default().push(record);
                acc
            })
            .into_iter()
            .map(|(operation_id, operations)| {
                let durations_ms = operations
                    .iter()
                    .filter_map(|op| op.duration())
                    .map(|d| d.as_micros() as f64 / 1000.0)
                    .collect::<Vec<_>>();
                let total_duration_ms = durations_ms.iter().sum::<f64>();

                OperationRow {
                    operation_id: operation_id.to_string(),
                    total_operations: operations.len(),
                    errors: operations.iter().filter(|op| op.is_error()).count(),
                    avg_time_ms: if durations_ms.is_empty() {
                        0.0
                    } else {
                        total_duration_ms / durations_ms.len() as f64
                    },
                    min_time_ms: durations_ms.iter().copied().reduce(f64::min).unwrap_or(0.0),
                    max_time_ms: durations_ms.iter().copied().reduce(f64::max).unwrap_or(0.0),
                }
            })
            .collect()
    }

    pub fn finalize(&self) {
        let rows = self.summarize();
        if rows.is_empty() {
            log::debug!("No operations recorded, skipping summary");
            return;
        }

        println!("\nSummary of operations");
        let mut table = Table::new(rows);
        table.with(Style::modern());

        println!("{table}");
    }
}
