use std::path::Path;

use skybook_core::validation::{check_airplane_dimensions, require_text};
use skybook_core::{CoreError, CoreResult};
use skybook_shared::{NewAirplane, NewAirplaneType, NewCrew};
use uuid::Uuid;

/// Directory, relative to the media root, that holds airplane images.
pub const AIRPLANE_IMAGE_DIR: &str = "uploads/airplanes";

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

pub fn validate_airplane_type(airplane_type: &NewAirplaneType) -> CoreResult<()> {
    require_text("name", &airplane_type.name)
}

pub fn validate_airplane(airplane: &NewAirplane) -> CoreResult<()> {
    require_text("name", &airplane.name)?;
    check_airplane_dimensions(airplane.rows, airplane.seats_in_row)
}

pub fn validate_crew(crew: &NewCrew) -> CoreResult<()> {
    require_text("first_name", &crew.first_name)?;
    require_text("last_name", &crew.last_name)
}

/// Media path for a freshly uploaded airplane image:
/// `uploads/airplanes/<slug of airplane name>-<uuid>.<ext>`.
pub fn airplane_image_path(airplane_name: &str, upload_name: &str) -> CoreResult<String> {
    let extension = Path::new(upload_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| CoreError::InvalidImage(format!("{} has no file extension", upload_name)))?;

    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(CoreError::InvalidImage(format!("unsupported extension .{}", extension)));
    }

    Ok(format!(
        "{}/{}-{}.{}",
        AIRPLANE_IMAGE_DIR,
        slugify(airplane_name),
        Uuid::new_v4(),
        extension
    ))
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "airplane".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airplane_dimensions_are_checked() {
        let airplane = NewAirplane { name: "ANN".into(), rows: 41, seats_in_row: 6, airplane_type_id: 1 };
        assert_eq!(validate_airplane(&airplane).unwrap_err().field(), Some("rows"));
    }

    #[test]
    fn test_crew_needs_both_names() {
        let crew = NewCrew { first_name: "Olena".into(), last_name: " ".into() };
        assert_eq!(validate_crew(&crew).unwrap_err().field(), Some("last_name"));
    }

    #[test]
    fn test_image_path_is_slugged_and_unique() {
        let first = airplane_image_path("Boeing 737 MAX", "photo.JPG").unwrap();
        let second = airplane_image_path("Boeing 737 MAX", "photo.JPG").unwrap();
        assert!(first.starts_with("uploads/airplanes/boeing-737-max-"));
        assert!(first.ends_with(".jpg"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_image_path_rejects_unknown_extension() {
        assert!(matches!(
            airplane_image_path("ANN", "notes.txt"),
            Err(CoreError::InvalidImage(_))
        ));
        assert!(airplane_image_path("ANN", "noext").is_err());
    }

    #[test]
    fn test_slugify_falls_back_for_symbols() {
        assert_eq!(slugify("***"), "airplane");
        assert_eq!(slugify("  An-225 Mriya "), "an-225-mriya");
    }
}
