//! Advisor conversation operations
//!
//! Messages live in one JSON column but are always parsed into typed
//! `ChatMessage` records at this boundary; nothing downstream sees raw JSON.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{ChatMessage, Conversation};

fn conversation_from_row(row: &Row<'_>) -> rusqlite::Result<Conversation> {
    let messages_json: String = row.get(3)?;
    let created_at_str: String = row.get(4)?;
    let updated_at_str: String = row.get(5)?;

    let messages: Vec<ChatMessage> = serde_json::from_str(&messages_json).unwrap_or_default();

    Ok(Conversation {
        id: row.get(0)?,
        business_id: row.get(1)?,
        title: row.get(2)?,
        messages,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

const CONVERSATION_COLUMNS: &str = "id, business_id, title, messages, created_at, updated_at";

impl Database {
    /// Create a conversation with its opening messages
    pub fn create_conversation(
        &self,
        business_id: i64,
        title: &str,
        messages: &[ChatMessage],
    ) -> Result<i64> {
        let json = serde_json::to_string(messages)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO conversations (business_id, title, messages) VALUES (?, ?, ?)",
            params![business_id, title, json],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a conversation by ID
    pub fn get_conversation(&self, id: i64) -> Result<Option<Conversation>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM conversations WHERE id = ?",
                CONVERSATION_COLUMNS
            ),
            params![id],
            conversation_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List a business's conversations, most recently active first
    pub fn list_conversations(&self, business_id: i64) -> Result<Vec<Conversation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM conversations WHERE business_id = ? ORDER BY updated_at DESC, id DESC",
            CONVERSATION_COLUMNS
        ))?;

        let conversations = stmt
            .query_map(params![business_id], conversation_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(conversations)
    }

    /// Replace a conversation's messages and bump its activity timestamp
    pub fn update_conversation_messages(&self, id: i64, messages: &[ChatMessage]) -> Result<()> {
        let json = serde_json::to_string(messages)?;
        let conn = self.conn()?;
        conn.execute(
            "UPDATE conversations SET messages = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![json, id],
        )?;
        Ok(())
    }

    /// Delete a conversation permanently
    pub fn delete_conversation(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM conversations WHERE id = ?", params![id])?;
        Ok(())
    }
}
