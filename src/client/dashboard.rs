use crate::{
    data::{search::StudentFilter, student::Student},
    error::RegistrarResult,
    store::StudentStore,
};
use uuid::Uuid;

/// The fetched list, the active filter and whichever card is open.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    students: Vec<Student>,
    filter: StudentFilter,
    selected: Option<Uuid>,
}

impl DashboardView {
    pub const fn new(students: Vec<Student>, filter: StudentFilter) -> Self {
        Self {
            students,
            filter,
            selected: None,
        }
    }

    ///always the full list, filtering happens here rather than in the store
    pub async fn fetch(store: &dyn StudentStore, filter: StudentFilter) -> RegistrarResult<Self> {
        Ok(Self::new(store.list().await?, filter))
    }

    #[must_use]
    pub fn with_selected(mut self, selected: Option<Uuid>) -> Self {
        self.selected = selected;
        self
    }

    ///every fetched record, ignoring the filter
    pub fn total(&self) -> usize {
        self.students.len()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Student> {
        self.filter.apply(&self.students)
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected == Some(id)
    }

    /// Forgets `id` locally, returning whether it was the open card.
    pub fn deleted(&mut self, id: Uuid) -> bool {
        self.students.retain(|student| student.id != id);

        if self.is_selected(id) {
            self.selected = None;
            true
        } else {
            false
        }
    }
}
