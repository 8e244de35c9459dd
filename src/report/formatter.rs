use crate::generator::Job;
use serde_json::Value;

/// Formats jobs into human-readable one-line summaries
pub struct JobFormatter;

impl JobFormatter {
    /// Format a job as `#<id>: name=value (node), ...`.
    pub fn format_job(job: &Job) -> String {
        let assignments = job
            .assignments
            .iter()
            .map(|a| {
                let node = match &a.target.title {
                    Some(title) => format!("{}{}", title, a.target.id),
                    None => a.target.id.to_string(),
                };
                format!("{}={} ({})", a.parameter, Self::format_value(&a.value), node)
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("#{}: {}", job.id, assignments)
    }

    /// Strings are shown without quotes; everything else as compact JSON.
    fn format_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Multi-line summary of a whole batch, one job per line.
    pub fn format_batch(jobs: &[Job]) -> String {
        let mut result = format!("{} job(s)\n", jobs.len());
        for job in jobs {
            result.push_str("  ");
            result.push_str(&Self::format_job(job));
            result.push('\n');
        }
        result
    }
}
