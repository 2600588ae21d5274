use serde::Deserialize;
use uuid::Uuid;

pub mod search;
pub mod student;
pub mod validation;

#[derive(Deserialize)]
pub struct IdForm {
    pub id: Uuid,
}
