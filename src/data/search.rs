use crate::data::student::Student;

/// What the dashboard narrows the fetched list down to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub search: String,
    pub course: Option<String>,
}

impl StudentFilter {
    pub fn new(search: Option<String>, course: Option<String>) -> Self {
        Self {
            search: search.unwrap_or_default(),
            course: course.filter(|course| !course.is_empty()),
        }
    }

    ///names and email match case-insensitively, phone numbers as typed
    pub fn matches(&self, student: &Student) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = student.first_name.to_lowercase().contains(&needle)
            || student.last_name.to_lowercase().contains(&needle)
            || student.email.to_lowercase().contains(&needle)
            || student.phone.contains(&self.search);

        let matches_course = self
            .course
            .as_deref()
            .is_none_or(|course| student.course.as_str() == course);

        matches_search && matches_course
    }

    pub fn apply<'a>(&'a self, students: &'a [Student]) -> impl Iterator<Item = &'a Student> {
        students.iter().filter(|student| self.matches(student))
    }
}
