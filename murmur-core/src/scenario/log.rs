use serde::Serialize;
use std::fmt;

use crate::models::{AgentId, Memory};
use crate::runtime::DynRuntime;

#[derive(Debug, Clone, Serialize)]
pub struct ConversationLine {
    pub sender: String,
    pub text: String,
}

/// One agent's view of its room.
#[derive(Debug, Clone, Serialize)]
pub struct Perspective {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub lines: Vec<ConversationLine>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationLog {
    pub perspectives: Vec<Perspective>,
}

impl ConversationLog {
    /// Pairs `participants` with the histories returned for them, in order.
    pub fn from_conversations(participants: &[DynRuntime], conversations: &[Vec<Memory>]) -> Self {
        let perspectives = participants
            .iter()
            .zip(conversations)
            .map(|(member, memories)| Perspective {
                agent_id: member.agent_id(),
                agent_name: member.character_name().to_string(),
                lines: memories
                    .iter()
                    .map(|m| ConversationLine {
                        sender: match m.sender_name() {
                            "" => "unknown".to_string(),
                            name => name.to_string(),
                        },
                        text: m.text().to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self { perspectives }
    }

    pub fn perspective(&self, agent_name: &str) -> Option<&Perspective> {
        self.perspectives.iter().find(|p| p.agent_name == agent_name)
    }

    pub fn message_count(&self) -> usize {
        self.perspectives.iter().map(|p| p.lines.len()).sum()
    }
}

impl fmt::Display for ConversationLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sender, self.text)
    }
}

impl fmt::Display for ConversationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, perspective) in self.perspectives.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}'s perspective:", perspective.agent_name)?;
            for line in &perspective.lines {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}
