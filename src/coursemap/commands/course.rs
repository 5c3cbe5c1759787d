use crate::commands::CourseField;
use crate::error::Result;
use crate::model::Course;

pub fn update_field(course: &Course, field: CourseField, value: impl Into<String>) -> Result<Course> {
    let mut next = course.clone();
    let value = value.into();
    match field {
        CourseField::Number => next.course_number = value,
        CourseField::Name => next.course_name = value,
        CourseField::Description => next.description = value,
    }
    Ok(next)
}
