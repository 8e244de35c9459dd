use crate::expander::VariantEntry;
use crate::graph::NodeId;
use ahash::AHashMap;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// Dense, zero-based position of a job in product order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(pub usize);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One full assignment of values to every swept parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    /// Exactly one entry per distinct parameter name, in group discovery order.
    pub assignments: Vec<VariantEntry>,
}

/// Variants sharing one parameter name, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGroup {
    pub parameter: String,
    pub variants: Vec<VariantEntry>,
}

/// Groups entries by parameter name. Groups appear in the order their name
/// first occurs; entries with the same name from different nodes share a group.
pub fn group_by_parameter(entries: &[VariantEntry]) -> Vec<ParameterGroup> {
    let mut groups: Vec<ParameterGroup> = Vec::new();
    let mut positions: AHashMap<&str, usize> = AHashMap::new();

    for entry in entries {
        let pos = *positions.entry(entry.parameter.as_str()).or_insert_with(|| {
            groups.push(ParameterGroup {
                parameter: entry.parameter.clone(),
                variants: Vec::new(),
            });
            groups.len() - 1
        });
        groups[pos].variants.push(entry.clone());
    }
    groups
}

/// Builds every job of the sweep.
///
/// The product is lexicographic: the first group is the outermost loop and
/// the last group varies fastest. No groups means no jobs.
pub fn generate(entries: &[VariantEntry]) -> Vec<Job> {
    let groups = group_by_parameter(entries);
    // `multi_cartesian_product` yields one empty combination for zero inputs.
    if groups.is_empty() {
        return Vec::new();
    }

    groups
        .iter()
        .map(|g| g.variants.iter())
        .multi_cartesian_product()
        .enumerate()
        .map(|(ordinal, combination)| Job {
            id: JobId(ordinal),
            assignments: combination.into_iter().cloned().collect(),
        })
        .collect()
}

/// Number of jobs `generate` will produce, without building them.
pub fn job_count(entries: &[VariantEntry]) -> usize {
    let groups = group_by_parameter(entries);
    if groups.is_empty() {
        return 0;
    }
    groups.iter().map(|g| g.variants.len()).product()
}

/// Serialized form of a job, written to the sink node for output correlation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// The job id. Outputs are named after it.
    pub file_name: usize,
    pub combination: Vec<AssignmentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub node_id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    pub widget_name: String,
    pub variant: serde_json::Value,
}

impl From<&Job> for JobRecord {
    fn from(job: &Job) -> Self {
        Self {
            file_name: job.id.0,
            combination: job
                .assignments
                .iter()
                .map(|a| AssignmentRecord {
                    node_id: a.target.id,
                    node_name: a.target.title.clone(),
                    widget_name: a.parameter.clone(),
                    variant: a.value.clone(),
                })
                .collect(),
        }
    }
}

/// Serializes the whole job list as a JSON array of [`JobRecord`]s.
pub fn job_list_json(jobs: &[Job]) -> Result<String, serde_json::Error> {
    let records: Vec<JobRecord> = jobs.iter().map(JobRecord::from).collect();
    serde_json::to_string(&records)
}
