use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema, sqlx::FromRow)]
pub struct Student {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ivan Petrov")]
    pub name: String,
    #[schema(example = "2001-04-17")]
    pub birth_date: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CreateStudentRequest {
    #[schema(example = "Ivan Petrov")]
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}
