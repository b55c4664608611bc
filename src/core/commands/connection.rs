// src/core/commands/connection.rs

use super::expect_ok;
use crate::core::MpdError;
use crate::core::engine::MpdClient;
use crate::core::parser::split_line;
use crate::core::protocol::CommandLine;

pub struct ConnectionCommands<'a> {
    pub(super) client: &'a MpdClient,
}

impl ConnectionCommands<'_> {
    pub async fn ping(&self) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("ping")).await
    }

    /// The tag types the daemon will report, in its order.
    pub async fn tag_types(&self) -> Result<Vec<String>, MpdError> {
        let lines = self.client.send_command(CommandLine::new("tagtypes")).await?;
        Ok(lines
            .iter()
            .filter_map(|line| split_line(line))
            .filter(|(key, _)| *key == "tagtype")
            .map(|(_, value)| value.to_string())
            .collect())
    }
}
