use serde::Serialize;

/// What a single evaluation pass measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub loss: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f32>,
}

/// The measurements of one training pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochRecord {
    pub epoch: usize,
    pub train: Evaluation,
    pub eval: Evaluation,
}

/// Every pass of a training run, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct History {
    records: Vec<EpochRecord>,
}

impl History {
    pub fn with_capacity(epochs: usize) -> Self {
        Self {
            records: Vec::with_capacity(epochs),
        }
    }

    pub fn push(&mut self, record: EpochRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }

    /// The history as pretty printed JSON, for embedding in the posts.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
