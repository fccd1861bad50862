use std::sync::Mutex;

use crate::confirm::Confirm;

/// Answers confirmation prompts from a script and records the prompts.
///
/// Once the script runs out every prompt is declined.
#[derive(Debug, Default)]
pub(crate) struct ScriptedConfirm {
    answers: Mutex<Vec<bool>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub(crate) fn new(answers: &[bool]) -> Self {
        let mut answers = answers.to_vec();
        answers.reverse();

        Self {
            answers: Mutex::new(answers),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_owned());
        self.answers.lock().unwrap().pop().unwrap_or(false)
    }
}
