use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymptomSeverity {
    Low,
    Moderate,
    High,
}

impl SymptomSeverity {
    pub const ALL: [Self; 3] = [Self::Low, Self::Moderate, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

/// Organism identified in the blood culture, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodCulture {
    Staphylococcus,
    #[serde(rename = "Escherichia coli")]
    EscherichiaColi,
    #[serde(rename = "Salmonella typhi")]
    SalmonellaTyphi,
    Others,
}

impl BloodCulture {
    pub const ALL: [Self; 4] = [
        Self::Staphylococcus,
        Self::EscherichiaColi,
        Self::SalmonellaTyphi,
        Self::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Staphylococcus => "Staphylococcus",
            Self::EscherichiaColi => "Escherichia coli",
            Self::SalmonellaTyphi => "Salmonella typhi",
            Self::Others => "Others",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrineCulture {
    #[serde(rename = "Escherichia coli")]
    EscherichiaColi,
    #[serde(rename = "Klebsiella pneumoniae")]
    KlebsiellaPneumoniae,
    Others,
}

impl UrineCulture {
    pub const ALL: [Self; 3] = [
        Self::EscherichiaColi,
        Self::KlebsiellaPneumoniae,
        Self::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::EscherichiaColi => "Escherichia coli",
            Self::KlebsiellaPneumoniae => "Klebsiella pneumoniae",
            Self::Others => "Others",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Medication {
    Amoxicillin,
    Azithromycin,
    Ceftriaxone,
}

impl Medication {
    pub const ALL: [Self; 3] = [Self::Amoxicillin, Self::Azithromycin, Self::Ceftriaxone];

    pub fn label(self) -> &'static str {
        match self {
            Self::Amoxicillin => "Amoxicillin",
            Self::Azithromycin => "Azithromycin",
            Self::Ceftriaxone => "Ceftriaxone",
        }
    }
}

/// Raw form values for one submission. Built fresh per request and
/// discarded after the outcome is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientReport {
    pub age: i64,
    pub gender: Gender,
    pub symptoms_severity: SymptomSeverity,
    pub hemoglobin: f64,
    pub platelet_count: i64,
    pub blood_culture_bacteria: BloodCulture,
    pub urine_culture_bacteria: UrineCulture,
    pub calcium: f64,
    pub potassium: f64,
    pub current_medication: Medication,
    pub treatment_duration: i64,
}

impl Default for PatientReport {
    // Widget defaults shown on the empty form.
    fn default() -> Self {
        Self {
            age: 30,
            gender: Gender::Male,
            symptoms_severity: SymptomSeverity::Low,
            hemoglobin: 15.0,
            platelet_count: 250_000,
            blood_culture_bacteria: BloodCulture::Staphylococcus,
            urine_culture_bacteria: UrineCulture::EscherichiaColi,
            calcium: 9.5,
            potassium: 4.0,
            current_medication: Medication::Amoxicillin,
            treatment_duration: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_serde() {
        // The form posts option labels verbatim; every label must
        // deserialize back to its variant.
        for culture in BloodCulture::ALL {
            let value = serde_json::to_value(culture).unwrap();
            assert_eq!(value, serde_json::Value::String(culture.label().into()));
        }
        let parsed: UrineCulture = serde_json::from_str("\"Klebsiella pneumoniae\"").unwrap();
        assert_eq!(parsed, UrineCulture::KlebsiellaPneumoniae);
    }

    #[test]
    fn test_report_deserializes_from_form_labels() {
        let report: PatientReport = serde_json::from_value(serde_json::json!({
            "age": 45,
            "gender": "Female",
            "symptoms_severity": "High",
            "hemoglobin": 12.5,
            "platelet_count": 180000,
            "blood_culture_bacteria": "Salmonella typhi",
            "urine_culture_bacteria": "Others",
            "calcium": 8.0,
            "potassium": 3.5,
            "current_medication": "Ceftriaxone",
            "treatment_duration": 10
        }))
        .unwrap();

        assert_eq!(report.gender, Gender::Female);
        assert_eq!(report.blood_culture_bacteria, BloodCulture::SalmonellaTyphi);
        assert_eq!(report.treatment_duration, 10);
    }
}
