use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Course {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Python")]
    pub name: String,
    /// Ids of enrolled students, ascending.
    #[serde(default)]
    pub students: Vec<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CreateCourseRequest {
    #[schema(example = "Python")]
    pub name: String,
    #[serde(default)]
    pub students: Vec<i64>,
}

/// Partial update; absent fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateCourseRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Django")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<i64>>,
}

/// Exact-match filters for the course list. Filters combine with AND.
#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseFilter {
    /// Course id
    pub id: Option<i64>,
    /// Course name
    pub name: Option<String>,
}
