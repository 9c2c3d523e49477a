//! Shared fixtures for the HTTP-level tests: a fresh in-memory database per
//! test and model factories that insert rows directly.

#![allow(dead_code)]

use courses_api::course::model::Course;
use courses_api::db::connect_in_memory;
use courses_api::student::model::Student;
use courses_api::AppState;
use rand::distributions::Alphanumeric;
use rand::Rng;

pub const MAX_STUDENTS: usize = 20;

pub async fn test_state() -> AppState {
    test_state_with_limit(MAX_STUDENTS).await
}

pub async fn test_state_with_limit(max_students_per_course: usize) -> AppState {
    let pool = connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    AppState::new_with_pool(pool, max_students_per_course)
        .await
        .expect("Failed to create AppState")
}

fn random_name(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("{}-{}", prefix, suffix)
}

/// Synthesizes courses with random names, like a model factory.
pub struct CourseFactory<'a> {
    state: &'a AppState,
}

impl<'a> CourseFactory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn make(&self, quantity: usize) -> Vec<Course> {
        let mut courses = Vec::with_capacity(quantity);
        for _ in 0..quantity {
            courses.push(self.make_with(&random_name("course"), &[]).await);
        }
        courses
    }

    pub async fn make_with(&self, name: &str, students: &[i64]) -> Course {
        self.state
            .insert_course(name, students)
            .await
            .expect("Failed to insert course")
    }
}

pub struct StudentFactory<'a> {
    state: &'a AppState,
}

impl<'a> StudentFactory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn make(&self, quantity: usize) -> Vec<Student> {
        let mut students = Vec::with_capacity(quantity);
        for _ in 0..quantity {
            let student = self
                .state
                .insert_student(&random_name("student"), None)
                .await
                .expect("Failed to insert student");
            students.push(student);
        }
        students
    }
}
