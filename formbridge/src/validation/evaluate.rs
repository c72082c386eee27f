use std::sync::Arc;

use super::rule::{ValidationRule, Verdict};
use crate::config::EngineConfig;
use crate::form::FieldInstance;
use crate::transition::{ErrorMessage, TransitionConfig};
use crate::widgets::Validatable;

/// Binds rules to instances and runs the error state machine.
///
/// Every evaluation takes a fresh sequence number; message transitions are
/// stamped with it so a late fade-out never undoes a newer outcome.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    fade_in: TransitionConfig,
    fade_out: TransitionConfig,
    seq: u64,
}

impl ValidationEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            fade_in: config.fade_in(),
            fade_out: config.fade_out(),
            seq: 0,
        }
    }

    /// Bind a rule to an instance. Instances without a rule are never in
    /// error.
    pub fn attach(&self, instance: &mut FieldInstance, rule: Option<Arc<ValidationRule>>) {
        instance.validator = rule;
    }

    /// Evaluate an instance, updating its error flag, label, picker styling
    /// and message.
    pub fn evaluate(&mut self, instance: &mut FieldInstance) -> Verdict {
        if instance.widget.ignores_validation() {
            return Verdict::Valid;
        }
        let Some(rule) = instance.validator.clone() else {
            return Verdict::Valid;
        };
        self.seq += 1;
        let seq = self.seq;

        let verdict = rule.check(&instance.widget.validation_value());
        match verdict {
            Verdict::Invalid if !instance.errored => {
                instance.set_errored(true);
                if let Some(text) = &rule.message {
                    instance.message = Some(ErrorMessage::fading_in(text, self.fade_in, seq));
                    instance.message_seq = seq;
                }
            }
            Verdict::Valid | Verdict::Missing if instance.errored => {
                instance.set_errored(false);
                if let Some(message) = &mut instance.message {
                    message.fade_out(self.fade_out, seq);
                    instance.message_seq = seq;
                }
            }
            _ => {}
        }
        verdict
    }

    /// Start the removal fade of a message whose instance is going away.
    pub fn detach_message(&mut self, mut message: ErrorMessage) -> ErrorMessage {
        self.seq += 1;
        message.fade_out(self.fade_out, self.seq);
        message
    }
}
