use std::path::Path;

use dicom::core::Tag;
use dicom::dictionary_std::tags;
use dicom::object::DefaultDicomObject;

use super::loader::open_dicom;
use crate::error::Result;
use crate::utils::{format_date, format_frame_rate, format_person_name, format_time};

/// Descriptive attributes shown in the form and used to pick a frame rate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StudyMetadata {
    pub patient_id: String,
    pub patient_name: String,
    pub patient_birth_date: String,
    pub patient_sex: String,
    pub study_id: String,
    pub study_date: String,
    pub study_time: String,
    pub institution_name: String,
    pub manufacturer: String,
    pub number_of_frames: u32,
    pub cine_rate: Option<f64>,
}

pub fn read_metadata(path: &Path) -> Result<StudyMetadata> {
    log::info!("Reading metadata: {}", path.display());
    let object = open_dicom(path)?;
    Ok(StudyMetadata::from_object(&object))
}

impl StudyMetadata {
    pub fn from_object(object: &DefaultDicomObject) -> Self {
        Self {
            patient_id: attribute_text(object, tags::PATIENT_ID),
            patient_name: attribute_text(object, tags::PATIENT_NAME),
            patient_birth_date: attribute_text(object, tags::PATIENT_BIRTH_DATE),
            patient_sex: attribute_text(object, tags::PATIENT_SEX),
            study_id: attribute_text(object, tags::STUDY_ID),
            study_date: attribute_text(object, tags::STUDY_DATE),
            study_time: attribute_text(object, tags::STUDY_TIME),
            institution_name: attribute_text(object, tags::INSTITUTION_NAME),
            manufacturer: attribute_text(object, tags::MANUFACTURER),
            number_of_frames: object
                .element(tags::NUMBER_OF_FRAMES)
                .ok()
                .and_then(|element| element.to_int::<u32>().ok())
                .unwrap_or(1),
            cine_rate: declared_frame_rate(object),
        }
    }

    /// Label/value pairs in form order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Patient ID", self.patient_id.clone()),
            ("Patient's Name", format_person_name(&self.patient_name)),
            ("Gender", self.patient_sex.clone()),
            ("Birth Date", format_date(&self.patient_birth_date)),
            ("Study ID", self.study_id.clone()),
            ("Study Date", format_date(&self.study_date)),
            ("Study Time", format_time(&self.study_time)),
            ("Institution Name", self.institution_name.clone()),
            ("Manufacturer", self.manufacturer.clone()),
            ("Frames", self.number_of_frames.to_string()),
            ("Cine Rate (fps)", format_frame_rate(self.cine_rate)),
        ]
    }
}

/// Cine Rate, then Recommended Display Frame Rate, then the inverse of
/// Frame Time (milliseconds).
fn declared_frame_rate(object: &DefaultDicomObject) -> Option<f64> {
    attribute_f64(object, tags::CINE_RATE)
        .or_else(|| attribute_f64(object, tags::RECOMMENDED_DISPLAY_FRAME_RATE))
        .or_else(|| attribute_f64(object, tags::FRAME_TIME).map(|millis| 1000.0 / millis))
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}

fn attribute_f64(object: &DefaultDicomObject, tag: Tag) -> Option<f64> {
    object
        .element(tag)
        .ok()
        .and_then(|element| element.to_float64().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
}

fn attribute_text(object: &DefaultDicomObject, tag: Tag) -> String {
    object
        .element(tag)
        .ok()
        .and_then(|element| element.to_str().ok())
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}
