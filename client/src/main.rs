use anyhow::{Context, Result};
use common::patient::{BloodCulture, Gender, Medication, SymptomSeverity, UrineCulture};
use common::{PatientReport, PredictResponse};
use std::env;
use std::time::{Duration, Instant};

struct PredictClient {
    server_url: String,
    client: reqwest::blocking::Client,
}

impl PredictClient {
    fn new(server_url: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { server_url, client })
    }

    fn wait_for_server(&self, timeout_secs: u64) -> Result<()> {
        let health_url = format!("{}/health", self.server_url);
        let start = Instant::now();

        println!("Waiting for server at {}...", self.server_url);

        while start.elapsed().as_secs() < timeout_secs {
            if let Ok(response) = self.client.get(&health_url).send() {
                if response.status().is_success() {
                    println!("✓ Server is ready!");
                    return Ok(());
                }
            }
            std::thread::sleep(Duration::from_secs(2));
        }

        anyhow::bail!("✗ Server failed to start within {}s", timeout_secs)
    }

    fn get_server_info(&self) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(format!("{}/info", self.server_url))
            .send()
            .context("Failed to get server info")?;

        let info: serde_json::Value = response.json()?;
        Ok(info)
    }

    fn predict(&self, report: &PatientReport) -> Result<PredictResponse> {
        let response = self
            .client
            .post(format!("{}/api/predict", self.server_url))
            .json(report)
            .send()
            .context("Failed to send predict request")?;

        if !response.status().is_success() {
            anyhow::bail!("Server returned error: {}", response.status());
        }

        let result: PredictResponse = response.json()?;
        Ok(result)
    }
}

// A submission a demo user might type into the form.
fn sample_report() -> PatientReport {
    PatientReport {
        age: 45,
        gender: Gender::Female,
        symptoms_severity: SymptomSeverity::High,
        hemoglobin: 11.2,
        platelet_count: 180_000,
        blood_culture_bacteria: BloodCulture::SalmonellaTyphi,
        urine_culture_bacteria: UrineCulture::Others,
        calcium: 8.4,
        potassium: 3.6,
        current_medication: Medication::Ceftriaxone,
        treatment_duration: 10,
    }
}

fn main() -> Result<()> {
    println!("========================================================================");
    println!("Typhoid Outcome Prediction Client");
    println!("========================================================================");

    let server_url = env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    println!("Server URL: {}", server_url);

    let client = PredictClient::new(server_url)?;

    client.wait_for_server(120)?;

    let server_info = client.get_server_info()?;
    println!("\nServer Info:");
    println!("{}", serde_json::to_string_pretty(&server_info)?);

    let report = sample_report();
    println!("\nSubmitting report:");
    println!("{}", serde_json::to_string_pretty(&report)?);

    let response = client.predict(&report)?;

    println!("\n========================================================================");
    println!("Prediction: The patient {}.", response.outcome);
    println!("Label: {}", response.label);
    println!("Inference time: {:.2}ms", response.inference_time_ms);
    println!("========================================================================");

    Ok(())
}
