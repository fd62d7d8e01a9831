use crate::core::probe::Probe;
use crate::domain::model::ApiResponse;
use crate::domain::ports::ApiTransport;
use crate::utils::error::{Result, SmokeError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Outcome of one passed probe.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub step: usize,
    pub probe_name: String,
    pub status: u16,
    pub duration: Duration,
}

/// Everything a fully passed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub results: Vec<ProbeResult>,
}

impl RunReport {
    pub fn summary(&self) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let total_duration: Duration = self.results.iter().map(|r| r.duration).sum();
        summary.insert("run_id".to_string(), serde_json::Value::String(self.run_id.clone()));
        summary.insert(
            "started_at".to_string(),
            serde_json::Value::String(self.started_at.to_rfc3339()),
        );
        summary.insert(
            "total_probes".to_string(),
            serde_json::Value::Number(self.results.len().into()),
        );
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((total_duration.as_millis() as u64).into()),
        );

        let names: Vec<serde_json::Value> = self
            .results
            .iter()
            .map(|r| serde_json::Value::String(r.probe_name.clone()))
            .collect();
        summary.insert("executed_probes".to_string(), serde_json::Value::Array(names));

        summary
    }
}

/// Runs probes strictly in order; the first failure ends the run.
pub struct SmokeDriver<T: ApiTransport> {
    transport: T,
    probes: Vec<Probe>,
    echo_json: bool,
    run_id: String,
}

impl<T: ApiTransport> SmokeDriver<T> {
    pub fn new(transport: T, probes: Vec<Probe>) -> Self {
        Self {
            transport,
            probes,
            echo_json: false,
            run_id: format!("smoke-{}", Utc::now().format("%Y%m%dT%H%M%S")),
        }
    }

    /// Print every raw response body to stdout.
    pub fn with_echo_json(mut self, enabled: bool) -> Self {
        self.echo_json = enabled;
        self
    }

    pub fn with_run_id(mut self, run_id: String) -> Self {
        self.run_id = run_id;
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let mut results = Vec::with_capacity(self.probes.len());

        tracing::info!("🚀 Starting smoke run {} ({} probes)", self.run_id, self.probes.len());

        for (index, probe) in self.probes.iter().enumerate() {
            let step = index + 1;
            let start_time = Instant::now();

            match self.run_probe(probe).await {
                Ok(status) => {
                    let result = ProbeResult {
                        step,
                        probe_name: probe.name(),
                        status,
                        duration: start_time.elapsed(),
                    };
                    tracing::info!(
                        "✅ [{}/{}] {} (HTTP {}, {:?})",
                        step,
                        self.probes.len(),
                        result.probe_name,
                        result.status,
                        result.duration
                    );
                    results.push(result);
                }
                Err(e) => {
                    tracing::error!("❌ [{}/{}] {} failed: {}", step, self.probes.len(), probe.name(), e);
                    return Err(SmokeError::ProbeFailed {
                        step,
                        probe: probe.name(),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(RunReport {
            run_id: self.run_id.clone(),
            started_at,
            results,
        })
    }

    async fn run_probe(&self, probe: &Probe) -> Result<u16> {
        let request = probe.call.to_request()?;
        tracing::debug!("📤 {}: {}", probe.name(), request.describe());
        if let Some(body) = &request.body {
            tracing::debug!("📤 {}: payload {}", probe.name(), body);
        }

        let response = self.transport.execute(&request).await?;
        if self.echo_json {
            echo(&response);
        }

        probe.evaluate(&response)?;
        Ok(response.status)
    }
}

fn echo(response: &ApiResponse) {
    match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(json) => match serde_json::to_string_pretty(&json) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", response.body),
        },
        Err(_) => println!("{}", response.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::ApiCall;
    use crate::core::scenario::Scenario;
    use crate::domain::model::{ApiRequest, LeaderboardSort};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replies from a script, in order, and records what was asked.
    #[derive(Clone)]
    struct MockTransport {
        responses: Arc<Mutex<VecDeque<ApiResponse>>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl MockTransport {
        fn new(responses: Vec<ApiResponse>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ApiTransport for MockTransport {
        async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push(request.describe());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| SmokeError::ConfigError {
                    message: format!("no scripted response for {}", request.describe()),
                })
        }
    }

    fn success(extra: serde_json::Value) -> ApiResponse {
        let mut body = json!({"status": "success"});
        if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }
        ApiResponse::new(200, body.to_string())
    }

    fn meal(id: u64, name: &str) -> serde_json::Value {
        json!({"id": id, "meal": name, "cuisine": "Italian", "price": 12.5, "difficulty": "MED"})
    }

    fn healthy_api_script() -> Vec<ApiResponse> {
        vec![
            ApiResponse::new(200, json!({"status": "healthy"}).to_string()),
            ApiResponse::new(200, json!({"database_status": "healthy"}).to_string()),
            success(json!({})),
            success(json!({})),
            ApiResponse::new(201, json!({"status": "success"}).to_string()),
            ApiResponse::new(201, json!({"status": "success"}).to_string()),
            ApiResponse::new(201, json!({"status": "success"}).to_string()),
            success(json!({"meal": meal(1, "Spaghetti")})),
            success(json!({"meal": meal(2, "Sushi")})),
            success(json!({})),
            success(json!({})),
            success(json!({"combatants": [meal(1, "Spaghetti"), meal(2, "Sushi")]})),
            success(json!({"winner": "Sushi"})),
            success(json!({"leaderboard": []})),
            success(json!({"leaderboard": []})),
            success(json!({})),
            success(json!({})),
        ]
    }

    #[tokio::test]
    async fn test_full_run_passes() {
        let transport = MockTransport::new(healthy_api_script());
        let driver = SmokeDriver::new(transport.clone(), Scenario::default().probes().unwrap())
            .with_run_id("test-run".to_string());

        let report = driver.run().await.unwrap();

        assert_eq!(report.results.len(), 17);
        assert_eq!(report.results[4].status, 201);
        assert_eq!(transport.requests().len(), 17);
        assert_eq!(transport.requests()[13], "GET /leaderboard?sort=wins");
        assert_eq!(transport.requests()[16], "POST /clear-combatants");

        let summary = report.summary();
        assert_eq!(summary.get("run_id").unwrap(), "test-run");
        assert_eq!(summary.get("total_probes").unwrap(), &json!(17));
        let executed = summary.get("executed_probes").unwrap().as_array().unwrap();
        assert_eq!(executed[0], "health");
        assert_eq!(executed[16], "clear-combatants");
    }

    #[tokio::test]
    async fn test_failure_halts_before_next_probe() {
        let mut script = healthy_api_script();
        script[2] = ApiResponse::new(200, json!({"status": "error", "message": "locked"}).to_string());
        let transport = MockTransport::new(script);
        let driver = SmokeDriver::new(transport.clone(), Scenario::default().probes().unwrap());

        let err = driver.run().await.unwrap_err();

        match &err {
            SmokeError::ProbeFailed { step, probe, source } => {
                assert_eq!(*step, 3);
                assert_eq!(probe, "clear-meals");
                assert!(matches!(**source, SmokeError::MarkerMismatch { .. }));
            }
            other => panic!("expected probe failure, got {:?}", other),
        }
        assert_eq!(err.exit_code(), 1);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_transport_error_halts_run() {
        let transport = MockTransport::new(vec![ApiResponse::new(200, json!({"status": "healthy"}).to_string())]);
        let driver = SmokeDriver::new(transport.clone(), Scenario::default().probes().unwrap());

        let err = driver.run().await.unwrap_err();

        assert!(matches!(err, SmokeError::ProbeFailed { step: 2, .. }));
        assert_eq!(transport.requests(), vec!["GET /health", "GET /db-check"]);
    }

    #[test]
    fn test_clear_meals_twice_is_idempotent() {
        let transport = MockTransport::new(vec![success(json!({})), success(json!({}))]);
        let driver = SmokeDriver::new(
            transport.clone(),
            vec![Probe::new(ApiCall::ClearMeals), Probe::new(ApiCall::ClearMeals)],
        );

        let report = tokio_test::block_on(driver.run()).unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(transport.requests(), vec!["DELETE /clear-meals", "DELETE /clear-meals"]);
    }

    #[tokio::test]
    async fn test_positional_lookup_mismatch_fails() {
        let mut script = healthy_api_script();
        // id 1 went to some other record: the server did not reset its id sequence
        script[7] = success(json!({"meal": meal(1, "Leftover Lasagna")}));
        let transport = MockTransport::new(script);
        let driver = SmokeDriver::new(transport.clone(), Scenario::default().probes().unwrap());

        let err = driver.run().await.unwrap_err();

        assert!(matches!(err, SmokeError::ProbeFailed { step: 8, .. }));
        assert!(err.to_string().contains("Leftover Lasagna"));
        assert_eq!(transport.requests().len(), 8);
    }

    #[tokio::test]
    async fn test_unsorted_leaderboard_fails() {
        let row = |id: u64, name: &str, wins: u64| {
            let win_pct = wins as f64 * 20.0;
            json!({
                "id": id, "meal": name, "cuisine": "Italian", "price": 10.0, "difficulty": "MED",
                "battles": 5, "wins": wins, "win_pct": win_pct
            })
        };
        let transport = MockTransport::new(vec![success(json!({
            "leaderboard": [row(1, "Spaghetti", 1), row(2, "Sushi", 3)]
        }))]);
        let probe = Probe::new(ApiCall::Leaderboard(LeaderboardSort::Wins))
            .with_expectation(crate::core::probe::Expectation::LeaderboardOrdered(LeaderboardSort::Wins));
        let driver = SmokeDriver::new(transport, vec![probe]);

        assert!(driver.run().await.is_err());
    }

    #[tokio::test]
    async fn test_echo_json_does_not_change_outcome() {
        let transport = MockTransport::new(vec![ApiResponse::new(200, "not json")]);
        let driver = SmokeDriver::new(transport, vec![Probe::new(ApiCall::Health)]).with_echo_json(true);

        assert!(matches!(
            driver.run().await,
            Err(SmokeError::ProbeFailed { step: 1, .. })
        ));
    }
}
