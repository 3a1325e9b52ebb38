use crate::patient::{
    BloodCulture, Gender, Medication, PatientReport, SymptomSeverity, UrineCulture,
};

/// Generation of the categorical code table below. Must match the
/// `encoding_version` declared for the artifact in `models.yaml`; the
/// classifier was trained against these exact codes and a mismatch is
/// undetectable at inference time.
pub const ENCODING_VERSION: u32 = 2;

pub const FEATURE_COUNT: usize = 11;

/// Column names the classifier was trained on, in input-tensor order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Age",
    "Gender",
    "Symptoms Severity",
    "Hemoglobin (g/dL)",
    "Platelet Count",
    "Blood Culture Bacteria",
    "Urine Culture Bacteria",
    "Calcium (mg/dL)",
    "Potassium (mmol/L)",
    "Current Medication",
    "Treatment Duration",
];

impl Gender {
    pub fn code(self) -> i64 {
        match self {
            Self::Male => 1,
            Self::Female => 0,
        }
    }
}

impl SymptomSeverity {
    pub fn code(self) -> i64 {
        match self {
            Self::Low => 0,
            Self::Moderate => 1,
            Self::High => 2,
        }
    }
}

impl BloodCulture {
    pub fn code(self) -> i64 {
        match self {
            Self::Staphylococcus => 1,
            Self::EscherichiaColi => 2,
            Self::SalmonellaTyphi => 3,
            Self::Others => 4,
        }
    }
}

impl UrineCulture {
    pub fn code(self) -> i64 {
        match self {
            Self::EscherichiaColi => 1,
            Self::KlebsiellaPneumoniae => 2,
            Self::Others => 3,
        }
    }
}

impl Medication {
    pub fn code(self) -> i64 {
        match self {
            Self::Amoxicillin => 1,
            Self::Azithromycin => 2,
            Self::Ceftriaxone => 3,
        }
    }
}

/// Bounds and default for one numeric widget. The same constant drives
/// the rendered input attributes and the server-side clamp, so the form
/// and the encoder cannot disagree.
#[derive(Debug, Clone, Copy)]
pub struct NumericField {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl NumericField {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

pub const AGE: NumericField = NumericField {
    label: "Age",
    min: 0.0,
    max: 100.0,
    default: 30.0,
    step: 1.0,
};

pub const HEMOGLOBIN: NumericField = NumericField {
    label: "Hemoglobin (g/dL)",
    min: 10.0,
    max: 25.0,
    default: 15.0,
    step: 0.1,
};

pub const PLATELET_COUNT: NumericField = NumericField {
    label: "Platelet Count",
    min: 150_000.0,
    max: 450_000.0,
    default: 250_000.0,
    step: 1000.0,
};

pub const CALCIUM: NumericField = NumericField {
    label: "Calcium (mg/dL)",
    min: 0.0,
    max: 15.0,
    default: 9.5,
    step: 0.1,
};

pub const POTASSIUM: NumericField = NumericField {
    label: "Potassium (mmol/L)",
    min: 0.0,
    max: 10.0,
    default: 4.0,
    step: 0.1,
};

pub const TREATMENT_DURATION: NumericField = NumericField {
    label: "Treatment Duration (days)",
    min: 0.0,
    max: 15.0,
    default: 7.0,
    step: 1.0,
};

/// Map one report to the classifier's input tensor. Pure: categorical
/// fields go through the code table, numeric fields are clamped to their
/// widget bounds and passed through. Element order matches
/// [`FEATURE_NAMES`].
pub fn encode(report: &PatientReport) -> [f32; FEATURE_COUNT] {
    [
        AGE.clamp(report.age as f64) as f32,
        report.gender.code() as f32,
        report.symptoms_severity.code() as f32,
        HEMOGLOBIN.clamp(report.hemoglobin) as f32,
        PLATELET_COUNT.clamp(report.platelet_count as f64) as f32,
        report.blood_culture_bacteria.code() as f32,
        report.urine_culture_bacteria.code() as f32,
        CALCIUM.clamp(report.calcium) as f32,
        POTASSIUM.clamp(report.potassium) as f32,
        report.current_medication.code() as f32,
        TREATMENT_DURATION.clamp(report.treatment_duration as f64) as f32,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_report() -> PatientReport {
        PatientReport {
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

    #[test]
    fn test_categorical_codes() {
        assert_eq!(Gender::Male.code(), 1);
        assert_eq!(Gender::Female.code(), 0);

        assert_eq!(SymptomSeverity::Low.code(), 0);
        assert_eq!(SymptomSeverity::Moderate.code(), 1);
        assert_eq!(SymptomSeverity::High.code(), 2);

        assert_eq!(BloodCulture::Staphylococcus.code(), 1);
        assert_eq!(BloodCulture::EscherichiaColi.code(), 2);
        assert_eq!(BloodCulture::SalmonellaTyphi.code(), 3);
        assert_eq!(BloodCulture::Others.code(), 4);

        assert_eq!(UrineCulture::EscherichiaColi.code(), 1);
        assert_eq!(UrineCulture::KlebsiellaPneumoniae.code(), 2);
        assert_eq!(UrineCulture::Others.code(), 3);

        assert_eq!(Medication::Amoxicillin.code(), 1);
        assert_eq!(Medication::Azithromycin.code(), 2);
        assert_eq!(Medication::Ceftriaxone.code(), 3);
    }

    #[test]
    fn test_scenario_vector() {
        let vector = encode(&scenario_report());
        assert_eq!(
            vector,
            [30.0, 1.0, 0.0, 15.0, 250_000.0, 1.0, 1.0, 9.5, 4.0, 1.0, 7.0]
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let report = PatientReport {
            gender: Gender::Female,
            symptoms_severity: SymptomSeverity::High,
            blood_culture_bacteria: BloodCulture::SalmonellaTyphi,
            urine_culture_bacteria: UrineCulture::Others,
            current_medication: Medication::Ceftriaxone,
            ..scenario_report()
        };
        assert_eq!(encode(&report), encode(&report));
        assert_eq!(encode(&report)[1], 0.0);
        assert_eq!(encode(&report)[2], 2.0);
        assert_eq!(encode(&report)[5], 3.0);
        assert_eq!(encode(&report)[6], 3.0);
        assert_eq!(encode(&report)[9], 3.0);
    }

    #[test]
    fn test_clamping_both_ends_of_every_bounded_field() {
        let low = PatientReport {
            age: -5,
            hemoglobin: 2.0,
            platelet_count: 1,
            calcium: -1.0,
            potassium: -0.5,
            treatment_duration: -3,
            ..scenario_report()
        };
        let vector = encode(&low);
        assert_eq!(vector[0], 0.0);
        assert_eq!(vector[3], 10.0);
        assert_eq!(vector[4], 150_000.0);
        assert_eq!(vector[7], 0.0);
        assert_eq!(vector[8], 0.0);
        assert_eq!(vector[10], 0.0);

        let high = PatientReport {
            age: 150,
            hemoglobin: 99.0,
            platelet_count: 9_000_000,
            calcium: 20.0,
            potassium: 11.0,
            treatment_duration: 40,
            ..scenario_report()
        };
        let vector = encode(&high);
        assert_eq!(vector[0], 100.0);
        assert_eq!(vector[3], 25.0);
        assert_eq!(vector[4], 450_000.0);
        assert_eq!(vector[7], 15.0);
        assert_eq!(vector[8], 10.0);
        assert_eq!(vector[10], 15.0);
    }

    #[test]
    fn test_in_range_values_pass_through_unchanged() {
        let report = PatientReport {
            age: 0,
            hemoglobin: 25.0,
            ..scenario_report()
        };
        let vector = encode(&report);
        assert_eq!(vector[0], 0.0);
        assert_eq!(vector[3], 25.0);
    }

    #[test]
    fn test_feature_names_align_with_vector_layout() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_NAMES[0], "Age");
        assert_eq!(FEATURE_NAMES[5], "Blood Culture Bacteria");
        assert_eq!(FEATURE_NAMES[10], "Treatment Duration");
    }
}
