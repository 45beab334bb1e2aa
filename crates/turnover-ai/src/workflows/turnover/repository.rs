use super::automation::AutomationConfig;
use super::domain::{Reservation, ReservationId, TaskId, TemplateId, TurnoverTask};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Automation configs are looked up by property and template; there is no
/// shared template cache, each call answers from the backing store.
pub trait TurnoverRepository: Send + Sync {
    fn insert_reservation(&self, reservation: Reservation)
        -> Result<Reservation, RepositoryError>;
    fn reservation(&self, id: &ReservationId) -> Result<Option<Reservation>, RepositoryError>;
    fn reservations(&self) -> Result<Vec<Reservation>, RepositoryError>;

    fn insert_task(&self, task: TurnoverTask) -> Result<TurnoverTask, RepositoryError>;
    fn update_task(&self, task: TurnoverTask) -> Result<(), RepositoryError>;
    fn task(&self, id: &TaskId) -> Result<Option<TurnoverTask>, RepositoryError>;
    fn tasks_for_reservation(
        &self,
        id: &ReservationId,
    ) -> Result<Vec<TurnoverTask>, RepositoryError>;

    fn automation_config(
        &self,
        property_name: &str,
        template: &TemplateId,
    ) -> Result<Option<AutomationConfig>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
