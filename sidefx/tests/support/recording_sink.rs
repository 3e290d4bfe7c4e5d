use vim_sidefx::CommandSink;

/// Records every command and can be told to fail the next one.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub commands: Vec<String>,
    fail_next: Option<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&mut self, message: &str) {
        self.fail_next = Some(message.to_string());
    }
}

impl CommandSink for RecordingSink {
    fn execute(&mut self, command: &str) -> Result<(), String> {
        if let Some(message) = self.fail_next.take() {
            return Err(message);
        }
        self.commands.push(command.to_string());
        Ok(())
    }
}
