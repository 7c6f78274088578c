use super::{CommandProvider, ReaderCommand};

/// Replays a fixed command list, one per poll.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedCommands<'a> {
    commands: &'a [ReaderCommand],
    cursor: usize,
}

impl<'a> ScriptedCommands<'a> {
    pub const fn new(commands: &'a [ReaderCommand]) -> Self {
        Self {
            commands,
            cursor: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.commands.len().saturating_sub(self.cursor)
    }
}

impl CommandProvider for ScriptedCommands<'_> {
    type Error = core::convert::Infallible;

    fn poll_command(&mut self) -> Result<Option<ReaderCommand>, Self::Error> {
        let Some(command) = self.commands.get(self.cursor).copied() else {
            return Ok(None);
        };
        self.cursor = self.cursor.saturating_add(1);
        Ok(Some(command))
    }
}
