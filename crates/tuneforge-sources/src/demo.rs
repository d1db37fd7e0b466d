//! Built-in demo transcripts.
//!
//! These follow the shape the generative log service is instructed to emit:
//! bracket-tagged narration lines with single-line metric records mixed in.

use serde::{Deserialize, Serialize};

use crate::scripted::ScriptedSource;

pub const DEPLOYMENT_LOG: &str = r#"[PROVISION] Requesting compute tier: 8x A100 80GB (on-demand)
[PROVISION] Node pool ready, NCCL topology verified
[DATA] Downloading research corpus (412 documents, 38.2 MB)
[DATA] Tokenizing with base tokenizer, max_seq_len=4096
[DATA] Packed 18,944 sequences into 74 shards
[TRAIN] (Pre-training) Loading base model weights in bf16
[TRAIN] (Pre-training) lr schedule: cosine, warmup=200 steps, peak=3e-4
{"type": "metric", "epoch": 1, "loss": 5.0821}
[TRAIN] (Pre-training) step 400/2400, tokens/s=51,230
{"type": "metric", "epoch": 2, "loss": 3.9147}
{"type": "metric", "epoch": 3, "loss": 3.1022}
[TRAIN] (Pre-training) step 1600/2400, grad_norm=0.84
{"type": "metric", "epoch": 4, "loss": 2.5518}
{"type": "metric", "epoch": 5, "loss": 2.2093}
[TRAIN] (Pre-training) Phase complete, final loss 2.2093
[TRAIN] (Fine-tuning) Loading base model in 4-bit NF4 quantization
[TRAIN] (Fine-tuning) Attaching LoRA adapters to q_proj, v_proj (r=16, alpha=32)
[TRAIN] (Fine-tuning) Trainable params: 8,388,608 (0.12% of total)
{"type": "metric", "epoch": 1, "loss": 1.9874}
{"type": "metric", "epoch": 2, "loss": 1.6120}
[TRAIN] (Fine-tuning) step 300/900, lr=1.8e-4
{"type": "metric", "epoch": 3, "loss": 1.2841}
{"type": "metric", "epoch": 4, "loss": 1.0377}
{"type": "metric", "epoch": 5, "loss": 0.8412}
[SAVE] Writing adapter weights to checkpoints/adapter_model.safetensors (33.6 MB)
[DEPLOY] Packaging model into serving container
[DEPLOY] Pushing image to registry
[DEPLOY] Creating serverless endpoint with 1 min replica
[DEPLOY] Health check passed (p50 latency 182 ms)
[SUCCESS] Deployment successful. Endpoint is now active.
"#;

pub const FINE_TUNING_LOG: &str = r#"[SETUP] Loading pre-trained model weights from previous step
[SETUP] Tokenizing and preparing the dataset (2,310 examples)
[TRAIN] Loading base model in 4-bit quantized format
[TRAIN] Attaching LoRA adapters to q_proj, v_proj
[TRAIN] Trainable params: 4,194,304 (0.06% of total)
[TRAIN] Starting training loop, lr=2e-4, batch_size=16
{"type": "metric", "epoch": 1, "loss": 2.4127}
{"type": "metric", "epoch": 2, "loss": 1.9630}
[TRAIN] step 120/360, lr=1.7e-4
{"type": "metric", "epoch": 3, "loss": 1.5512}
{"type": "metric", "epoch": 4, "loss": 1.2208}
{"type": "metric", "epoch": 5, "loss": 0.9716}
[SAVE] Saving adapter weights (16.8 MB)
[SUCCESS] Fine-tuning complete. Model checkpoint saved successfully.
"#;

/// A built-in demo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    #[default]
    Deployment,
    FineTuning,
}

impl Scenario {
    #[must_use]
    pub fn transcript(self) -> &'static str {
        match self {
            Self::Deployment => DEPLOYMENT_LOG,
            Self::FineTuning => FINE_TUNING_LOG,
        }
    }

    /// A word-chunked source replaying this scenario.
    #[must_use]
    pub fn source(self) -> ScriptedSource {
        ScriptedSource::new(self.to_string(), self.transcript())
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deployment => f.write_str("deployment"),
            Self::FineTuning => f.write_str("fine-tuning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuneforge_abstraction::LogSource;

    #[test]
    fn test_transcripts_end_with_success_line() {
        for scenario in [Scenario::Deployment, Scenario::FineTuning] {
            let last = scenario.transcript().lines().last().unwrap();
            assert!(last.starts_with("[SUCCESS]"), "{scenario}: {last}");
        }
    }

    #[test]
    fn test_transcripts_contain_metric_records() {
        let count = DEPLOYMENT_LOG.lines().filter(|l| l.starts_with("{\"type\"")).count();
        assert_eq!(count, 10);
    }

    #[test]
    fn test_scenario_source_id() {
        assert_eq!(Scenario::FineTuning.source().source_id(), "fine-tuning");
    }
}
