//! Translation between domain entities and the weakly-typed record fields.
//!
//! Field names match the persisted document shapes of the original cloud
//! schema (`player1ID`, `isPlayer1Turn`, ...). Absent or mistyped fields
//! decode to per-type defaults; only a payload that is not a JSON object at
//! all is treated as malformed.

use serde_json::{Value, json};
use trivia_types::{Match, User};

use crate::entities::records;
use crate::error::StoreError;

pub const USER_RECORD: &str = "User";
pub const MATCH_RECORD: &str = "Match";

fn str_field(fields: &Value, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn opt_str_field(fields: &Value, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

fn int_field(fields: &Value, key: &str, default: i32) -> i32 {
    fields
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(default)
}

fn bool_field(fields: &Value, key: &str, default: bool) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn opt_float_field(fields: &Value, key: &str) -> Option<f64> {
    fields.get(key).and_then(Value::as_f64)
}

fn list_field(fields: &Value, key: &str) -> Vec<String> {
    fields
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn object_fields(model: &records::Model) -> Result<&Value, StoreError> {
    if model.fields.is_object() {
        Ok(&model.fields)
    } else {
        Err(StoreError::Decode {
            record_type: model.record_type.clone(),
            id: model.id.clone(),
        })
    }
}

pub fn user_fields(user: &User) -> Value {
    json!({
        "id": user.id,
        "name": user.display_name,
    })
}

pub fn user_from_record(model: &records::Model) -> Result<User, StoreError> {
    let fields = object_fields(model)?;
    let id = match str_field(fields, "id") {
        id if id.is_empty() => model.id.clone(),
        id => id,
    };
    Ok(User {
        id,
        display_name: str_field(fields, "name"),
    })
}

pub fn match_fields(record: &Match) -> Value {
    json!({
        "player1ID": record.player1_id,
        "player2ID": record.player2_id,
        "currentRound": record.current_round,
        "player1Score": record.player1_score,
        "player2Score": record.player2_score,
        "currentQuestionID": record.current_question_id,
        "previousQuestions": record.previous_question_ids,
        "player1Answer": record.player1_answer,
        "player2Answer": record.player2_answer,
        "player1Time": record.player1_time,
        "player2Time": record.player2_time,
        "isPlayer1Turn": record.is_player1_turn,
        "isCompleted": record.is_completed,
    })
}

pub fn match_from_record(model: &records::Model) -> Result<Match, StoreError> {
    let fields = object_fields(model)?;
    Ok(Match {
        id: model.id.clone(),
        player1_id: str_field(fields, "player1ID"),
        player2_id: opt_str_field(fields, "player2ID"),
        current_round: int_field(fields, "currentRound", 1),
        player1_score: int_field(fields, "player1Score", 0),
        player2_score: int_field(fields, "player2Score", 0),
        current_question_id: str_field(fields, "currentQuestionID"),
        previous_question_ids: list_field(fields, "previousQuestions"),
        player1_answer: opt_str_field(fields, "player1Answer"),
        player2_answer: opt_str_field(fields, "player2Answer"),
        player1_time: opt_float_field(fields, "player1Time"),
        player2_time: opt_float_field(fields, "player2Time"),
        is_player1_turn: bool_field(fields, "isPlayer1Turn", true),
        is_completed: bool_field(fields, "isCompleted", false),
        revision: model.revision,
        modified_at: Some(model.modified_at.to_rfc3339()),
    })
}
