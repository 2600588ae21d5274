use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::{fmt, ops::Deref};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|gender| gender.as_str() == name)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    Electronics,
    Mechanical,
    Civil,
    #[serde(rename = "Information Technology")]
    InformationTechnology,
    Electrical,
}

impl Course {
    pub const ALL: [Self; 6] = [
        Self::ComputerScience,
        Self::Electronics,
        Self::Mechanical,
        Self::Civil,
        Self::InformationTechnology,
        Self::Electrical,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ComputerScience => "Computer Science",
            Self::Electronics => "Electronics",
            Self::Mechanical => "Mechanical",
            Self::Civil => "Civil",
            Self::InformationTechnology => "Information Technology",
            Self::Electrical => "Electrical",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|course| course.as_str() == name)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// A record that has passed validation, ready to be handed to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Date,
    pub gender: Gender,
    pub course: Course,
    pub year: u8,
    pub address: Address,
    pub guardian_name: String,
    pub guardian_phone: String,
}

impl NewStudent {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: NewStudent,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Deref for Student {
    type Target = NewStudent;

    fn deref(&self) -> &Self::Target {
        &self.details
    }
}

/// Every user-editable field of a record, addressed by its dotted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StudentField {
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    Gender,
    Course,
    Year,
    Street,
    City,
    State,
    ZipCode,
    GuardianName,
    GuardianPhone,
}

impl StudentField {
    pub const ALL: [Self; 14] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::DateOfBirth,
        Self::Gender,
        Self::Course,
        Self::Year,
        Self::Street,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::GuardianName,
        Self::GuardianPhone,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::DateOfBirth => "dateOfBirth",
            Self::Gender => "gender",
            Self::Course => "course",
            Self::Year => "year",
            Self::Street => "address.street",
            Self::City => "address.city",
            Self::State => "address.state",
            Self::ZipCode => "address.zipCode",
            Self::GuardianName => "guardianName",
            Self::GuardianPhone => "guardianPhone",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.path() == path)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Phone => "Phone Number",
            Self::DateOfBirth => "Date of Birth",
            Self::Gender => "Gender",
            Self::Course => "Course",
            Self::Year => "Year",
            Self::Street => "Street Address",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "Zip Code",
            Self::GuardianName => "Guardian Name",
            Self::GuardianPhone => "Guardian Phone",
        }
    }
}

impl fmt::Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl Serialize for StudentField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

/// A candidate record as submitted, possibly partial.
///
/// `year` stays a raw JSON value so that both numbers and the strings posted by
/// HTML forms reach the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub course: Option<String>,
    pub year: Option<Value>,
    pub address: Option<AddressDraft>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressDraft {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl StudentDraft {
    pub fn set(&mut self, field: StudentField, value: String) {
        match field {
            StudentField::FirstName => self.first_name = Some(value),
            StudentField::LastName => self.last_name = Some(value),
            StudentField::Email => self.email = Some(value),
            StudentField::Phone => self.phone = Some(value),
            StudentField::DateOfBirth => self.date_of_birth = Some(value),
            StudentField::Gender => self.gender = Some(value),
            StudentField::Course => self.course = Some(value),
            StudentField::Year => self.year = Some(Value::String(value)),
            StudentField::Street => self.address_mut().street = Some(value),
            StudentField::City => self.address_mut().city = Some(value),
            StudentField::State => self.address_mut().state = Some(value),
            StudentField::ZipCode => self.address_mut().zip_code = Some(value),
            StudentField::GuardianName => self.guardian_name = Some(value),
            StudentField::GuardianPhone => self.guardian_phone = Some(value),
        }
    }

    /// The current value of a field as it would be shown in an input, empty if unset.
    pub fn value_of(&self, field: StudentField) -> String {
        let address = self.address.as_ref();
        let text = match field {
            StudentField::FirstName => self.first_name.as_deref(),
            StudentField::LastName => self.last_name.as_deref(),
            StudentField::Email => self.email.as_deref(),
            StudentField::Phone => self.phone.as_deref(),
            StudentField::DateOfBirth => self.date_of_birth.as_deref(),
            StudentField::Gender => self.gender.as_deref(),
            StudentField::Course => self.course.as_deref(),
            StudentField::Year => {
                return match &self.year {
                    Some(Value::String(year)) => year.clone(),
                    Some(Value::Number(year)) => year.to_string(),
                    _ => String::new(),
                };
            }
            StudentField::Street => address.and_then(|a| a.street.as_deref()),
            StudentField::City => address.and_then(|a| a.city.as_deref()),
            StudentField::State => address.and_then(|a| a.state.as_deref()),
            StudentField::ZipCode => address.and_then(|a| a.zip_code.as_deref()),
            StudentField::GuardianName => self.guardian_name.as_deref(),
            StudentField::GuardianPhone => self.guardian_phone.as_deref(),
        };

        text.unwrap_or_default().to_string()
    }

    fn address_mut(&mut self) -> &mut AddressDraft {
        self.address.get_or_insert_with(AddressDraft::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_paths_round_trip() {
        for field in StudentField::ALL {
            assert_eq!(StudentField::from_path(field.path()), Some(field));
        }
        assert_eq!(StudentField::from_path("address"), None);
    }

    #[test]
    fn course_names_match_serde_names() {
        for course in Course::ALL {
            assert_eq!(json!(course), json!(course.as_str()));
            assert_eq!(Course::from_name(course.as_str()), Some(course));
        }
        assert_eq!(Course::from_name("Underwater Basket Weaving"), None);
    }

    #[test]
    fn draft_accepts_partial_camel_case_json() {
        let draft: StudentDraft = serde_json::from_value(json!({
            "firstName": "Asha",
            "year": 2,
            "address": { "zipCode": "400001" }
        }))
        .expect("partial draft deserialises");

        assert_eq!(draft.value_of(StudentField::FirstName), "Asha");
        assert_eq!(draft.value_of(StudentField::Year), "2");
        assert_eq!(draft.value_of(StudentField::ZipCode), "400001");
        assert_eq!(draft.value_of(StudentField::City), "");
        assert_eq!(draft.value_of(StudentField::Email), "");
    }

    #[test]
    fn setting_nested_fields_creates_the_address() {
        let mut draft = StudentDraft::default();
        draft.set(StudentField::City, "Mumbai".to_string());
        draft.set(StudentField::Year, "3".to_string());

        assert_eq!(
            draft.address,
            Some(AddressDraft {
                city: Some("Mumbai".to_string()),
                ..AddressDraft::default()
            })
        );
        assert_eq!(draft.year, Some(Value::String("3".to_string())));
    }
}
