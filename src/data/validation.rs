//! The single rule set deciding whether a [`StudentDraft`] is acceptable.
//!
//! The registration form runs it before submitting and the registrar runs it
//! again before anything reaches a store, so both always agree.

use crate::data::student::{
    Address, AddressDraft, Course, Gender, NewStudent, StudentDraft, StudentField,
};
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, sync::LazyLock};

pub const MIN_AGE: f64 = 15.0;
pub const MAX_AGE: f64 = 100.0;
const MILLIS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0 * 1000.0;

const NAME_LENGTH: std::ops::RangeInclusive<usize> = 2..=50;
const YEARS: std::ops::RangeInclusive<u8> = 1..=4;
const PHONE_DIGITS: usize = 10;
const ZIP_DIGITS: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$")
        .expect("email pattern is a valid regex")
});

/// Field path to message, ordered the way the form lays fields out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<StudentField, String>);

impl FieldErrors {
    pub fn single(field: StudentField, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: StudentField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: StudentField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: StudentField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Age in 365-day years between midnight UTC on `date_of_birth` and `now`.
///
/// Leap days are ignored, so birthdays can be off by a day or so.
#[allow(clippy::cast_precision_loss)]
pub fn age_in_years(date_of_birth: Date, now: Timestamp) -> Option<f64> {
    let born = date_of_birth.to_zoned(TimeZone::UTC).ok()?.timestamp();
    let elapsed = now.as_millisecond() - born.as_millisecond();
    Some(elapsed as f64 / MILLIS_PER_YEAR)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, whose UTC date is used.
pub fn parse_date_of_birth(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    //`Date` parsing also accepts datetimes and drops their offset, so instants go first
    raw.parse::<Timestamp>()
        .ok()
        .map(|ts| ts.to_zoned(TimeZone::UTC).date())
        .or_else(|| raw.parse::<Date>().ok())
}

/// Every violated constraint of `draft`, empty when it is valid.
pub fn check(draft: &StudentDraft, now: Timestamp) -> FieldErrors {
    validate(draft, now).err().unwrap_or_default()
}

/// Validates every field independently, producing a normalised record or all of the errors.
pub fn validate(draft: &StudentDraft, now: Timestamp) -> Result<NewStudent, FieldErrors> {
    let mut errors = FieldErrors::default();

    let first_name = name(
        draft.first_name.as_deref(),
        StudentField::FirstName,
        "First name",
        &mut errors,
    );
    let last_name = name(
        draft.last_name.as_deref(),
        StudentField::LastName,
        "Last name",
        &mut errors,
    );
    let email = email(draft.email.as_deref(), &mut errors);
    let phone = digits(
        draft.phone.as_deref(),
        PHONE_DIGITS,
        StudentField::Phone,
        "Phone number is required",
        "Please enter a valid 10-digit phone number",
        &mut errors,
    );
    let date_of_birth = date_of_birth(draft.date_of_birth.as_deref(), now, &mut errors);
    let gender = required(
        draft.gender.as_deref(),
        StudentField::Gender,
        "Gender is required",
        &mut errors,
    )
    .and_then(|raw| {
        let gender = Gender::from_name(raw);
        if gender.is_none() {
            errors.insert(StudentField::Gender, "Gender must be one of Male, Female, Other");
        }
        gender
    });
    let course = required(
        draft.course.as_deref(),
        StudentField::Course,
        "Course is required",
        &mut errors,
    )
    .and_then(|raw| {
        let course = Course::from_name(raw);
        if course.is_none() {
            errors.insert(StudentField::Course, "Course must be one of the offered programs");
        }
        course
    });
    let year = year(draft.year.as_ref(), &mut errors);
    let address = address(draft.address.as_ref(), &mut errors);
    let guardian_name = required(
        draft.guardian_name.as_deref(),
        StudentField::GuardianName,
        "Guardian name is required",
        &mut errors,
    );
    let guardian_phone = digits(
        draft.guardian_phone.as_deref(),
        PHONE_DIGITS,
        StudentField::GuardianPhone,
        "Guardian phone is required",
        "Please enter a valid 10-digit phone number",
        &mut errors,
    );

    let (
        Some(first_name),
        Some(last_name),
        Some(email),
        Some(phone),
        Some(date_of_birth),
        Some(gender),
        Some(course),
        Some(year),
        Some(address),
        Some(guardian_name),
        Some(guardian_phone),
    ) = (
        first_name,
        last_name,
        email,
        phone,
        date_of_birth,
        gender,
        course,
        year,
        address,
        guardian_name,
        guardian_phone,
    )
    else {
        return Err(errors);
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewStudent {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email,
        phone,
        date_of_birth,
        gender,
        course,
        year,
        address,
        guardian_name: guardian_name.to_string(),
        guardian_phone,
    })
}

/// The nested address gets its own pass; its keys are already path-qualified.
fn address(draft: Option<&AddressDraft>, errors: &mut FieldErrors) -> Option<Address> {
    let empty = AddressDraft::default();
    let draft = draft.unwrap_or(&empty);

    let street = required(
        draft.street.as_deref(),
        StudentField::Street,
        "Street address is required",
        errors,
    );
    let city = required(
        draft.city.as_deref(),
        StudentField::City,
        "City is required",
        errors,
    );
    let state = required(
        draft.state.as_deref(),
        StudentField::State,
        "State is required",
        errors,
    );
    let zip_code = digits(
        draft.zip_code.as_deref(),
        ZIP_DIGITS,
        StudentField::ZipCode,
        "Zip code is required",
        "Please enter a valid 6-digit zip code",
        errors,
    );

    Some(Address {
        street: street?.to_string(),
        city: city?.to_string(),
        state: state?.to_string(),
        zip_code: zip_code?,
    })
}

fn required<'a>(
    value: Option<&'a str>,
    field: StudentField,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Some(trimmed),
        _ => {
            errors.insert(field, message);
            None
        }
    }
}

fn name<'a>(
    value: Option<&'a str>,
    field: StudentField,
    noun: &str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    let trimmed = required(value, field, &format!("{noun} is required"), errors)?;
    let length = trimmed.chars().count();

    if length < *NAME_LENGTH.start() {
        errors.insert(
            field,
            format!("{noun} must be at least {} characters", NAME_LENGTH.start()),
        );
        None
    } else if length > *NAME_LENGTH.end() {
        errors.insert(
            field,
            format!("{noun} cannot exceed {} characters", NAME_LENGTH.end()),
        );
        None
    } else {
        Some(trimmed)
    }
}

fn email(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let email = required(value, StudentField::Email, "Email is required", errors)?.to_lowercase();

    if EMAIL_PATTERN.is_match(&email) {
        Some(email)
    } else {
        errors.insert(StudentField::Email, "Please enter a valid email address");
        None
    }
}

/// Emptiness is judged after trimming, but the digits themselves must match untrimmed.
fn digits(
    value: Option<&str>,
    count: usize,
    field: StudentField,
    required_message: &str,
    invalid_message: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    required(value, field, required_message, errors)?;
    let raw = value.unwrap_or_default();

    if raw.len() == count && raw.bytes().all(|b| b.is_ascii_digit()) {
        Some(raw.to_string())
    } else {
        errors.insert(field, invalid_message);
        None
    }
}

fn date_of_birth(value: Option<&str>, now: Timestamp, errors: &mut FieldErrors) -> Option<Date> {
    let raw = required(
        value,
        StudentField::DateOfBirth,
        "Date of birth is required",
        errors,
    )?;

    let Some(date) = parse_date_of_birth(raw) else {
        errors.insert(StudentField::DateOfBirth, "Please enter a valid date of birth");
        return None;
    };

    match age_in_years(date, now) {
        Some(age) if (MIN_AGE..=MAX_AGE).contains(&age) => Some(date),
        _ => {
            errors.insert(
                StudentField::DateOfBirth,
                "Age must be between 15 and 100 years",
            );
            None
        }
    }
}

fn year(value: Option<&Value>, errors: &mut FieldErrors) -> Option<u8> {
    let parsed = match value {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) if raw.trim().is_empty() => None,
        Some(Value::String(raw)) => Some(
            raw.trim()
                .parse::<i64>()
                .ok()
                .or_else(|| raw.trim().parse::<f64>().ok().and_then(whole_number)),
        ),
        Some(Value::Number(number)) => Some(
            number
                .as_i64()
                .or_else(|| number.as_f64().and_then(whole_number)),
        ),
        Some(_) => Some(None),
    };

    let Some(parsed) = parsed else {
        errors.insert(StudentField::Year, "Year is required");
        return None;
    };

    let year = parsed
        .and_then(|year| u8::try_from(year).ok())
        .filter(|year| YEARS.contains(year));
    if year.is_none() {
        errors.insert(StudentField::Year, "Year must be between 1 and 4");
    }
    year
}

///`2.0` is as good a year as `2`
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn whole_number(value: f64) -> Option<i64> {
    (value.fract() == 0.0).then_some(value as i64)
}
