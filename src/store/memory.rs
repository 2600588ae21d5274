use crate::{
    data::student::{NewStudent, Student},
    error::{RegistrarError, RegistrarResult},
    store::StudentStore,
};
use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

///oldest first, so `list` walks it backwards
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    students: RwLock<Vec<Student>>,
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn create(&self, student: NewStudent) -> RegistrarResult<Student> {
        let mut students = self.students.write().await;

        if students.iter().any(|existing| existing.email == student.email) {
            return Err(RegistrarError::DuplicateEmail {
                email: student.email,
            });
        }

        let now = Timestamp::now();
        let student = Student {
            id: Uuid::new_v4(),
            details: student,
            created_at: now,
            updated_at: now,
        };
        students.push(student.clone());

        Ok(student)
    }

    async fn list(&self) -> RegistrarResult<Vec<Student>> {
        Ok(self.students.read().await.iter().rev().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RegistrarResult<Option<Student>> {
        Ok(self
            .students
            .read()
            .await
            .iter()
            .find(|student| student.id == id)
            .cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> RegistrarResult<bool> {
        let mut students = self.students.write().await;
        let before = students.len();
        students.retain(|student| student.id != id);
        Ok(students.len() != before)
    }

    async fn close(&self) {
        debug!("Nothing to close for the in-memory store");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::search::tests::student;
    use crate::data::student::Course;
    use std::sync::Arc;

    fn new_student(first_name: &str) -> NewStudent {
        student(first_name, Course::Civil).details
    }

    #[tokio::test]
    async fn created_records_round_trip() {
        let store = MemoryStudentStore::default();
        let new = new_student("Ann");

        let created = store.create(new.clone()).await.expect("create succeeds");
        let fetched = store
            .get_by_id(created.id)
            .await
            .expect("lookup succeeds")
            .expect("record exists");

        assert_eq!(fetched.details, new);
        assert_eq!(fetched, created);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStudentStore::default();
        store.create(new_student("Ann")).await.expect("create succeeds");
        store.create(new_student("Bob")).await.expect("create succeeds");

        let names: Vec<_> = store
            .list()
            .await
            .expect("list succeeds")
            .into_iter()
            .map(|s| s.details.first_name)
            .collect();
        assert_eq!(names, ["Bob", "Ann"]);
    }

    #[tokio::test]
    async fn duplicate_emails_are_rejected() {
        let store = MemoryStudentStore::default();
        store.create(new_student("Ann")).await.expect("first create succeeds");

        let second = store.create(new_student("Ann")).await;

        assert!(matches!(second, Err(RegistrarError::DuplicateEmail { email }) if email == "ann@example.com"));
        assert_eq!(store.list().await.expect("list succeeds").len(), 1);
    }

    #[tokio::test]
    async fn concurrent_duplicates_have_exactly_one_winner() {
        let store = Arc::new(MemoryStudentStore::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create(new_student("Ann")).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.expect("task joins") {
                Ok(_) => successes += 1,
                Err(e) => assert!(matches!(e, RegistrarError::DuplicateEmail { .. })),
            }
        }

        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn deleting_twice_reports_nothing_the_second_time() {
        let store = MemoryStudentStore::default();
        let created = store.create(new_student("Ann")).await.expect("create succeeds");

        assert!(store.delete_by_id(created.id).await.expect("delete succeeds"));
        assert!(!store.delete_by_id(created.id).await.expect("delete succeeds"));
        assert!(store.get_by_id(created.id).await.expect("lookup succeeds").is_none());
    }
}
