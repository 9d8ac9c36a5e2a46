use serde::Deserialize;
use std::fs;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    pub pipeline_name: String,
    pub duration_secs: u64,
    pub producer_period_ms: u64,
    pub chart_period_ms: u64,
    /// Handoff queue capacity (samples held between two chart ticks).
    pub handoff_capacity: usize,
    /// History capacity; oldest samples are evicted past this.
    pub history_capacity: usize,
    pub initial_visible_secs: f64,
    /// Free-capacity percentage restored by an eviction pass.
    pub headroom_percent: usize,
    pub output_csv: Option<String>,
}

impl PipelineConfig {
    pub fn producer_period(&self) -> Duration {
        Duration::from_millis(self.producer_period_ms)
    }

    pub fn chart_period(&self) -> Duration {
        Duration::from_millis(self.chart_period_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pipeline_name: "random-walk-demo".to_string(),
            duration_secs: 10,
            producer_period_ms: 100,
            chart_period_ms: 100,
            handoff_capacity: 10_000,
            history_capacity: 10_000,
            initial_visible_secs: 60.0,
            headroom_percent: 5,
            output_csv: None,
        }
    }
}

pub fn load_config(path: &str) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: PipelineConfig = toml::from_str(
            r#"
            pipeline_name = "bench"
            duration_secs = 30
            producer_period_ms = 50
            chart_period_ms = 100
            handoff_capacity = 512
            history_capacity = 2048
            initial_visible_secs = 20.0
            headroom_percent = 10
            output_csv = "out.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.pipeline_name, "bench");
        assert_eq!(config.producer_period(), Duration::from_millis(50));
        assert_eq!(config.handoff_capacity, 512);
        assert_eq!(config.headroom_percent, 10);
        assert_eq!(config.output_csv.as_deref(), Some("out.csv"));
    }

    #[test]
    fn csv_output_is_optional() {
        let config: PipelineConfig = toml::from_str(
            r#"
            pipeline_name = "demo"
            duration_secs = 10
            producer_period_ms = 100
            chart_period_ms = 100
            handoff_capacity = 10000
            history_capacity = 10000
            initial_visible_secs = 60.0
            headroom_percent = 5
            "#,
        )
        .unwrap();

        assert!(config.output_csv.is_none());
    }
}
