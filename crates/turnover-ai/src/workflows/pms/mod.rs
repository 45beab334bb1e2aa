//! Import of reservation exports from the property-management system.
//!
//! The export is one CSV row per stay. Rows are grouped per property and
//! sorted by check-in so each reservation learns the following check-in at
//! its property; every imported stay also receives one seeded turnover
//! cleaning task whose status folds the export's housekeeping column.

mod normalizer;
mod parser;

use crate::workflows::turnover::domain::{
    Reservation, ReservationId, TaskId, TaskStatus, TemplateId, TurnoverTask,
};
use crate::workflows::turnover::repository::{RepositoryError, TurnoverRepository};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

use parser::PmsRecord;

/// Template the seeded cleaning task is filed under; automation rules for
/// imported stays key off this identifier.
pub const CLEANING_TEMPLATE: &str = "turnover_clean";

#[derive(Debug)]
pub enum PmsImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for PmsImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PmsImportError::Io(err) => write!(f, "failed to read reservation export: {}", err),
            PmsImportError::Csv(err) => write!(f, "invalid reservation CSV data: {}", err),
        }
    }
}

impl std::error::Error for PmsImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PmsImportError::Io(err) => Some(err),
            PmsImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PmsImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for PmsImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Result of one export run: reservations with their derived next
/// check-ins, plus the seeded cleaning task per stay.
#[derive(Debug, Clone)]
pub struct PmsImport {
    pub reservations: Vec<Reservation>,
    pub tasks: Vec<TurnoverTask>,
}

impl PmsImport {
    /// Load everything into a repository, reservations before tasks.
    pub fn seed_repository<R>(&self, repository: &R) -> Result<(), RepositoryError>
    where
        R: TurnoverRepository,
    {
        for reservation in &self.reservations {
            repository.insert_reservation(reservation.clone())?;
        }
        for task in &self.tasks {
            repository.insert_task(task.clone())?;
        }
        Ok(())
    }
}

pub struct PmsReservationImporter;

impl PmsReservationImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PmsImport, PmsImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<PmsImport, PmsImportError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut by_property: BTreeMap<String, Vec<ImportedStay>> = BTreeMap::new();

        for record in parser::parse_records(reader)? {
            if record.reservation_id.is_empty() {
                continue;
            }
            // Stays without both dates cannot be placed or chained.
            let (Some(check_in), Some(check_out)) = (record.check_in, record.check_out) else {
                continue;
            };
            if !seen.insert(record.reservation_id.clone()) {
                continue;
            }

            by_property
                .entry(record.property_key.clone())
                .or_default()
                .push(ImportedStay {
                    record,
                    check_in,
                    check_out,
                });
        }

        let mut reservations = Vec::new();
        let mut tasks = Vec::new();

        for mut stays in by_property.into_values() {
            stays.sort_by(|a, b| {
                a.check_in
                    .cmp(&b.check_in)
                    .then_with(|| a.record.reservation_id.cmp(&b.record.reservation_id))
            });

            for index in 0..stays.len() {
                let next_check_in = stays.get(index + 1).map(|stay| stay.check_in);
                let stay = &stays[index];

                reservations.push(Reservation {
                    id: ReservationId(stay.record.reservation_id.clone()),
                    property_name: stay.record.property_display.clone(),
                    check_in: stay.check_in,
                    check_out: stay.check_out,
                    next_check_in,
                });
                tasks.push(cleaning_task(&stay.record));
            }
        }

        Ok(PmsImport {
            reservations,
            tasks,
        })
    }
}

struct ImportedStay {
    record: PmsRecord,
    check_in: NaiveDateTime,
    check_out: NaiveDateTime,
}

fn cleaning_task(record: &PmsRecord) -> TurnoverTask {
    let status = TaskStatus::parse(record.housekeeping_status.as_deref().unwrap_or(""));

    TurnoverTask {
        id: TaskId(format!("{}-clean", record.reservation_id)),
        reservation_id: Some(ReservationId(record.reservation_id.clone())),
        template_id: TemplateId(CLEANING_TEMPLATE.to_string()),
        name: "Turnover clean".to_string(),
        status,
        scheduled_start: None,
        assigned_user_ids: BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;
    use std::sync::Mutex;

    const HEADER: &str = "Reservation ID,Property,Check-In,Check-Out,Housekeeping Status\n";

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .expect("valid date")
            .and_hms_opt(h, min, 0)
            .expect("valid time")
    }

    #[test]
    fn parse_datetime_supports_the_export_formats() {
        let rfc = parser::parse_datetime_for_tests("2024-06-10T11:00:00Z").expect("parse rfc");
        assert_eq!(rfc, dt(2024, 6, 10, 11, 0));

        let wall = parser::parse_datetime_for_tests("2024-06-10 15:30").expect("parse wall clock");
        assert_eq!(wall, dt(2024, 6, 10, 15, 30));

        let date = parser::parse_datetime_for_tests("2024-06-10").expect("parse date");
        assert_eq!(date, dt(2024, 6, 10, 0, 0));

        assert!(parser::parse_datetime_for_tests("  ").is_none());
        assert!(parser::parse_datetime_for_tests("next tuesday").is_none());
    }

    #[test]
    fn property_names_normalize_for_matching_but_display_intact() {
        assert_eq!(
            normalizer::normalize_for_tests("\u{feff}Cedar  Loft "),
            "cedar loft"
        );
        assert_eq!(
            normalizer::clean_for_tests("\u{feff}Cedar  Loft "),
            "Cedar Loft"
        );
    }

    #[test]
    fn import_chains_next_check_in_within_each_property() {
        let csv = HEADER.to_string()
            + "res-b2,Birch House,2024-06-05 16:00,2024-06-09 10:00,\n\
res-a2,Cedar Loft,2024-06-12 16:00,2024-06-15 11:00,In Progress\n\
res-a1,cedar  loft,2024-06-05 16:00,2024-06-10 11:00,Completed\n\
res-a3,Cedar Loft,2024-06-15 16:00,2024-06-20 11:00,\n";

        let import = PmsReservationImporter::from_reader(Cursor::new(csv)).expect("import");
        let ids: Vec<&str> = import
            .reservations
            .iter()
            .map(|reservation| reservation.id.0.as_str())
            .collect();
        assert_eq!(ids, vec!["res-b2", "res-a1", "res-a2", "res-a3"]);

        let by_id = |id: &str| {
            import
                .reservations
                .iter()
                .find(|reservation| reservation.id.0 == id)
                .expect("reservation present")
        };

        // Casing differences between rows do not break the chain.
        assert_eq!(by_id("res-a1").next_check_in, Some(dt(2024, 6, 12, 16, 0)));
        assert_eq!(by_id("res-a2").next_check_in, Some(dt(2024, 6, 15, 16, 0)));
        assert!(by_id("res-a2").same_day_turnover());
        assert_eq!(by_id("res-a3").next_check_in, None);
        assert_eq!(by_id("res-b2").next_check_in, None);
    }

    #[test]
    fn import_keeps_the_display_casing_of_the_first_row() {
        let csv = HEADER.to_string()
            + "res-1,Cedar  Loft,2024-06-05 16:00,2024-06-10 11:00,\n";

        let import = PmsReservationImporter::from_reader(Cursor::new(csv)).expect("import");
        assert_eq!(import.reservations[0].property_name, "Cedar Loft");
    }

    #[test]
    fn import_skips_rows_without_both_dates() {
        let csv = HEADER.to_string()
            + "res-1,Cedar Loft,2024-06-05 16:00,,Completed\n\
res-2,Cedar Loft,,2024-06-10 11:00,\n\
res-3,Cedar Loft,2024-06-12 16:00,2024-06-15 11:00,\n";

        let import = PmsReservationImporter::from_reader(Cursor::new(csv)).expect("import");
        assert_eq!(import.reservations.len(), 1);
        assert_eq!(import.reservations[0].id.0, "res-3");
        assert_eq!(import.tasks.len(), 1);
    }

    #[test]
    fn import_keeps_the_first_of_duplicate_reservation_ids() {
        let csv = HEADER.to_string()
            + "res-1,Cedar Loft,2024-06-05 16:00,2024-06-10 11:00,Completed\n\
res-1,Cedar Loft,2024-07-01 16:00,2024-07-04 11:00,\n";

        let import = PmsReservationImporter::from_reader(Cursor::new(csv)).expect("import");
        assert_eq!(import.reservations.len(), 1);
        assert_eq!(
            import.reservations[0].check_in,
            dt(2024, 6, 5, 16, 0)
        );
        assert_eq!(import.tasks[0].status, TaskStatus::Complete);
    }

    #[test]
    fn seeded_tasks_fold_the_housekeeping_column() {
        let csv = HEADER.to_string()
            + "res-1,Cedar Loft,2024-06-05 16:00,2024-06-10 11:00,Completed\n\
res-2,Cedar Loft,2024-06-12 16:00,2024-06-15 11:00,In Progress\n\
res-3,Cedar Loft,2024-06-16 16:00,2024-06-19 11:00,awaiting inspection\n";

        let import = PmsReservationImporter::from_reader(Cursor::new(csv)).expect("import");
        let statuses: Vec<(String, TaskStatus)> = import
            .tasks
            .iter()
            .map(|task| (task.id.0.clone(), task.status))
            .collect();

        assert_eq!(
            statuses,
            vec![
                ("res-1-clean".to_string(), TaskStatus::Complete),
                ("res-2-clean".to_string(), TaskStatus::InProgress),
                ("res-3-clean".to_string(), TaskStatus::NotStarted),
            ]
        );
        assert!(import
            .tasks
            .iter()
            .all(|task| task.template_id.0 == CLEANING_TEMPLATE));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = PmsReservationImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            PmsImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[derive(Default)]
    struct CountingRepository {
        reservations: Mutex<Vec<Reservation>>,
        tasks: Mutex<Vec<TurnoverTask>>,
    }

    impl TurnoverRepository for CountingRepository {
        fn insert_reservation(
            &self,
            reservation: Reservation,
        ) -> Result<Reservation, RepositoryError> {
            let mut guard = self.reservations.lock().expect("reservation mutex poisoned");
            guard.push(reservation.clone());
            Ok(reservation)
        }

        fn reservation(
            &self,
            _id: &ReservationId,
        ) -> Result<Option<Reservation>, RepositoryError> {
            Ok(None)
        }

        fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError> {
            Ok(self
                .reservations
                .lock()
                .expect("reservation mutex poisoned")
                .clone())
        }

        fn insert_task(&self, task: TurnoverTask) -> Result<TurnoverTask, RepositoryError> {
            let mut guard = self.tasks.lock().expect("task mutex poisoned");
            guard.push(task.clone());
            Ok(task)
        }

        fn update_task(&self, _task: TurnoverTask) -> Result<(), RepositoryError> {
            Ok(())
        }

        fn task(&self, _id: &TaskId) -> Result<Option<TurnoverTask>, RepositoryError> {
            Ok(None)
        }

        fn tasks_for_reservation(
            &self,
            _id: &ReservationId,
        ) -> Result<Vec<TurnoverTask>, RepositoryError> {
            Ok(Vec::new())
        }

        fn automation_config(
            &self,
            _property_name: &str,
            _template: &TemplateId,
        ) -> Result<Option<crate::workflows::turnover::automation::AutomationConfig>, RepositoryError>
        {
            Ok(None)
        }
    }

    #[test]
    fn seed_repository_loads_reservations_and_tasks() {
        let csv = HEADER.to_string()
            + "res-1,Cedar Loft,2024-06-05 16:00,2024-06-10 11:00,Completed\n\
res-2,Birch House,2024-06-12 16:00,2024-06-15 11:00,\n";

        let import = PmsReservationImporter::from_reader(Cursor::new(csv)).expect("import");
        let repository = CountingRepository::default();
        import.seed_repository(&repository).expect("seed succeeds");

        assert_eq!(repository.reservations().expect("list").len(), 2);
        assert_eq!(
            repository.tasks.lock().expect("task mutex poisoned").len(),
            2
        );
    }
}
