use std::fs::File;

use crate::HistoryStore;

/// Best-effort CSV sink for charted samples.
///
/// Runs beside the pipeline as an independent side consumer: a write error
/// is logged once and the recorder disables itself; it never blocks a tick
/// or fails the run.
pub struct CsvRecorder {
    writer: Option<csv::Writer<File>>,
    path: String,
    rows_written: u64,
}

impl CsvRecorder {
    pub fn create(path: &str, channels: usize) -> Result<Self, Box<dyn std::error::Error>> {
        let mut writer = csv::Writer::from_path(path)?;
        let mut header = vec!["elapsed_secs".to_string()];
        header.extend((0..channels).map(|n| format!("channel{n}")));
        writer.write_record(&header)?;
        Ok(Self {
            writer: Some(writer),
            path: path.to_string(),
            rows_written: 0,
        })
    }

    /// Append the `appended` newest history rows, i.e. what the last tick
    /// folded in.
    pub fn record_tail<const C: usize>(&mut self, history: &HistoryStore<C>, appended: usize) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let start = history.len().saturating_sub(appended);
        let mut row: Vec<String> = Vec::with_capacity(C + 1);
        for index in start..history.len() {
            row.clear();
            row.push(history.timestamps()[index].to_string());
            for channel in 0..C {
                row.push(history.series(channel)[index].to_string());
            }
            if let Err(err) = writer.write_record(&row) {
                log::error!("csv recording to {} failed, disabling recorder: {err}", self.path);
                self.writer = None;
                return;
            }
            self.rows_written += 1;
        }
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn finish(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            match writer.flush() {
                Ok(()) => log::info!("saved {} samples to {}", self.rows_written, self.path),
                Err(err) => log::error!("csv flush to {} failed: {err}", self.path),
            }
        }
    }
}
