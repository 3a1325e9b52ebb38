use common::encoding::{
    NumericField, AGE, CALCIUM, HEMOGLOBIN, PLATELET_COUNT, POTASSIUM, TREATMENT_DURATION,
};
use common::patient::{BloodCulture, Gender, Medication, SymptomSeverity, UrineCulture};
use common::{Outcome, PatientReport};

const PAGE_TITLE: &str = "Typhoid Diagnosis Prediction";

const INTRO: &str = "This app classifies the outcome of typhoid treatments based on a \
combination of patient symptoms, laboratory test results, and prescribed medications. \
The model predicts whether a treatment is likely to be successful, or not. Please \
input the following parameters:";

/// Render the single form page. With `None` the page is awaiting a
/// submission; with an outcome it shows the prediction for the report
/// the widgets currently hold. Widget order matches the feature vector.
pub fn render(report: &PatientReport, outcome: Option<Outcome>) -> String {
    let mut widgets = String::new();
    widgets.push_str(&number_input("age", &AGE, report.age as f64));
    widgets.push_str(&select_input(
        "gender",
        "Gender",
        &selections(&Gender::ALL, Gender::label, report.gender),
    ));
    widgets.push_str(&select_input(
        "symptoms_severity",
        "Symptoms Severity",
        &selections(
            &SymptomSeverity::ALL,
            SymptomSeverity::label,
            report.symptoms_severity,
        ),
    ));
    widgets.push_str(&number_input("hemoglobin", &HEMOGLOBIN, report.hemoglobin));
    widgets.push_str(&number_input(
        "platelet_count",
        &PLATELET_COUNT,
        report.platelet_count as f64,
    ));
    widgets.push_str(&select_input(
        "blood_culture_bacteria",
        "Blood Culture Bacteria",
        &selections(
            &BloodCulture::ALL,
            BloodCulture::label,
            report.blood_culture_bacteria,
        ),
    ));
    widgets.push_str(&select_input(
        "urine_culture_bacteria",
        "Urine Culture Bacteria",
        &selections(
            &UrineCulture::ALL,
            UrineCulture::label,
            report.urine_culture_bacteria,
        ),
    ));
    widgets.push_str(&number_input("calcium", &CALCIUM, report.calcium));
    widgets.push_str(&number_input("potassium", &POTASSIUM, report.potassium));
    widgets.push_str(&select_input(
        "current_medication",
        "Current Medication",
        &selections(
            &Medication::ALL,
            Medication::label,
            report.current_medication,
        ),
    ));
    widgets.push_str(&number_input(
        "treatment_duration",
        &TREATMENT_DURATION,
        report.treatment_duration as f64,
    ));

    let result = match outcome {
        Some(outcome) => format!(
            "    <p class=\"result\"><strong>Prediction: The patient {}.</strong></p>\n",
            outcome
        ),
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}\n\
         label {{ display: block; margin: 0.75rem 0; }}\n\
         input, select {{ display: block; margin-top: 0.25rem; width: 100%; }}\n\
         .result {{ border: 1px solid #999; padding: 0.75rem; }}\n\
         </style>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <p>{intro}</p>\n\
         <form action=\"/predict\" method=\"post\">\n\
         {widgets}\
         <button type=\"submit\">Predict</button>\n\
         </form>\n\
         {result}\
         </body>\n\
         </html>\n",
        title = PAGE_TITLE,
        intro = INTRO,
        widgets = widgets,
        result = result,
    )
}

fn number_input(name: &str, field: &NumericField, value: f64) -> String {
    format!(
        "<label>{}\n  <input type=\"number\" name=\"{}\" min=\"{}\" max=\"{}\" step=\"{}\" value=\"{}\" required>\n</label>\n",
        field.label, name, field.min, field.max, field.step, value
    )
}

fn select_input(name: &str, label: &str, options: &[(&str, bool)]) -> String {
    let mut html = format!("<label>{}\n  <select name=\"{}\">\n", label, name);
    for (option, selected) in options {
        let attr = if *selected { " selected" } else { "" };
        html.push_str(&format!(
            "    <option value=\"{}\"{}>{}</option>\n",
            option, attr, option
        ));
    }
    html.push_str("  </select>\n</label>\n");
    html
}

fn selections<T: Copy + PartialEq>(
    all: &[T],
    label: impl Fn(T) -> &'static str,
    current: T,
) -> Vec<(&'static str, bool)> {
    all.iter().map(|&v| (label(v), v == current)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_awaiting_page_has_all_widgets_and_no_result() {
        let page = render(&PatientReport::default(), None);
        for name in [
            "age",
            "gender",
            "symptoms_severity",
            "hemoglobin",
            "platelet_count",
            "blood_culture_bacteria",
            "urine_culture_bacteria",
            "calcium",
            "potassium",
            "current_medication",
            "treatment_duration",
        ] {
            assert!(page.contains(&format!("name=\"{}\"", name)), "missing {name}");
        }
        assert!(!page.contains("Prediction:"));
    }

    #[test]
    fn test_rendered_page_shows_exactly_one_outcome_string() {
        let recovered = render(&PatientReport::default(), Some(Outcome::Recovered));
        assert!(recovered.contains("Prediction: The patient RECOVERED."));
        assert!(!recovered.contains("DID NOT RECOVER"));

        let failed = render(&PatientReport::default(), Some(Outcome::DidNotRecover));
        assert!(failed.contains("Prediction: The patient DID NOT RECOVER."));
        assert!(!failed.contains("The patient RECOVERED."));
    }

    #[test]
    fn test_widgets_reflect_the_submitted_report() {
        let report = PatientReport {
            age: 62,
            gender: Gender::Female,
            blood_culture_bacteria: BloodCulture::SalmonellaTyphi,
            ..PatientReport::default()
        };
        let page = render(&report, Some(Outcome::Recovered));
        assert!(page.contains("name=\"age\" min=\"0\" max=\"100\" step=\"1\" value=\"62\""));
        assert!(page.contains("value=\"Female\" selected"));
        assert!(page.contains("value=\"Salmonella typhi\" selected"));
        assert!(!page.contains("value=\"Male\" selected"));
    }
}
