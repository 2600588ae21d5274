use crate::{
    config::DbConfig,
    data::student::{Address, Course, Gender, NewStudent, Student},
    error::{
        InvalidDateSnafu, InvalidStoredStudentSnafu, MakeQuerySnafu, MigrateSnafu,
        OpenDatabaseSnafu, RegistrarError, RegistrarResult,
    },
    store::StudentStore,
};
use async_trait::async_trait;
use jiff::{Timestamp, civil::Date};
use snafu::{OptionExt, ResultExt};
use sqlx::{FromRow, Pool, Postgres, postgres::PgPoolOptions};
use time::{Month, OffsetDateTime};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct PostgresStudentStore {
    pool: Pool<Postgres>,
}

impl PostgresStudentStore {
    pub async fn open(db_config: &DbConfig) -> RegistrarResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(15)
            .connect(&db_config.get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self { pool })
    }
}

#[derive(FromRow)]
struct StudentRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    date_of_birth: time::Date,
    gender: String,
    course: String,
    year: i16,
    address_street: String,
    address_city: String,
    address_state: String,
    address_zip_code: String,
    guardian_name: String,
    guardian_phone: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<StudentRow> for Student {
    type Error = RegistrarError;

    fn try_from(row: StudentRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let unreadable = |field: &'static str| InvalidStoredStudentSnafu { id, field };

        Ok(Self {
            id,
            details: NewStudent {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
                date_of_birth: from_store_date(row.date_of_birth)
                    .context(unreadable("date_of_birth"))?,
                gender: Gender::from_name(&row.gender).context(unreadable("gender"))?,
                course: Course::from_name(&row.course).context(unreadable("course"))?,
                year: u8::try_from(row.year).ok().context(unreadable("year"))?,
                address: Address {
                    street: row.address_street,
                    city: row.address_city,
                    state: row.address_state,
                    zip_code: row.address_zip_code,
                },
                guardian_name: row.guardian_name,
                guardian_phone: row.guardian_phone,
            },
            created_at: from_store_timestamp(row.created_at).context(unreadable("created_at"))?,
            updated_at: from_store_timestamp(row.updated_at).context(unreadable("updated_at"))?,
        })
    }
}

fn to_store_date(date: Date) -> RegistrarResult<time::Date> {
    let month = Month::try_from(date.month().unsigned_abs()).context(InvalidDateSnafu { date })?;
    time::Date::from_calendar_date(i32::from(date.year()), month, date.day().unsigned_abs())
        .context(InvalidDateSnafu { date })
}

fn from_store_date(date: time::Date) -> Option<Date> {
    let year = i16::try_from(date.year()).ok()?;
    let month = i8::try_from(u8::from(date.month())).ok()?;
    let day = i8::try_from(date.day()).ok()?;
    Date::new(year, month, day).ok()
}

fn from_store_timestamp(odt: OffsetDateTime) -> Option<Timestamp> {
    Timestamp::from_nanosecond(odt.unix_timestamp_nanos()).ok()
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn create(&self, student: NewStudent) -> RegistrarResult<Student> {
        let date_of_birth = to_store_date(student.date_of_birth)?;

        let inserted = sqlx::query_as::<_, StudentRow>(
            "INSERT INTO public.students (id, first_name, last_name, email, phone, date_of_birth, gender, course, year, address_street, address_city, address_state, address_zip_code, guardian_name, guardian_phone) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(date_of_birth)
        .bind(student.gender.as_str())
        .bind(student.course.as_str())
        .bind(i16::from(student.year))
        .bind(&student.address.street)
        .bind(&student.address.city)
        .bind(&student.address.state)
        .bind(&student.address.zip_code)
        .bind(&student.guardian_name)
        .bind(&student.guardian_phone)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => row.try_into(),
            //the only unique column we don't generate ourselves is the email
            Err(sqlx::Error::Database(db_error)) if db_error.is_unique_violation() => {
                Err(RegistrarError::DuplicateEmail {
                    email: student.email,
                })
            }
            Err(source) => Err(RegistrarError::MakeQuery { source }),
        }
    }

    async fn list(&self) -> RegistrarResult<Vec<Student>> {
        sqlx::query_as::<_, StudentRow>(
            "SELECT * FROM public.students ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context(MakeQuerySnafu)?
        .into_iter()
        .map(Student::try_from)
        .collect()
    }

    async fn get_by_id(&self, id: Uuid) -> RegistrarResult<Option<Student>> {
        sqlx::query_as::<_, StudentRow>("SELECT * FROM public.students WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context(MakeQuerySnafu)?
            .map(Student::try_from)
            .transpose()
    }

    async fn delete_by_id(&self, id: Uuid) -> RegistrarResult<bool> {
        let result = sqlx::query("DELETE FROM public.students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context(MakeQuerySnafu)?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
