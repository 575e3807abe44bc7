//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::catalog::{Assessment, SCALE_LABELS};
use crate::domain::AssessmentResult;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Begin (or resume) the assessment; replies with the current question.
    Start,
    Answer {
        score: f64,
    },
    Back,
    Restart,
    EmailResult {
        to: String,
        #[serde(default)]
        subject: Option<String>,
    },
}

impl ClientWsMessage {
    /// Message type for logs; payloads may carry addresses and stay out of them.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientWsMessage::Ping => "ping",
            ClientWsMessage::Start => "start",
            ClientWsMessage::Answer { .. } => "answer",
            ClientWsMessage::Back => "back",
            ClientWsMessage::Restart => "restart",
            ClientWsMessage::EmailResult { .. } => "email_result",
        }
    }
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Question {
        index: usize,
        total: usize,
        text: String,
        #[serde(rename = "currentAnswer")]
        current_answer: Option<u8>,
    },
    Result {
        result: AssessmentResult,
    },
    EmailSent {
        id: String,
    },
    Error {
        message: String,
    },
}

/// Assessment definition as shown to respondents. Reverse-coding flags stay server-side.
#[derive(Debug, Serialize)]
pub struct AssessmentOut {
    pub title: String,
    pub scale: Vec<ScalePointOut>,
    pub questions: Vec<QuestionOut>,
    pub categories: Vec<CategoryOut>,
}

#[derive(Debug, Serialize)]
pub struct ScalePointOut {
    pub score: u8,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryOut {
    pub name: String,
    pub questions: Vec<usize>,
}

pub fn to_out(a: &Assessment) -> AssessmentOut {
    AssessmentOut {
        title: a.title().to_string(),
        scale: SCALE_LABELS
            .iter()
            .map(|&(score, label)| ScalePointOut { score, label })
            .collect(),
        questions: a
            .questions()
            .iter()
            .enumerate()
            .map(|(index, q)| QuestionOut { index, text: q.text.clone() })
            .collect(),
        categories: a
            .categories()
            .iter()
            .map(|c| CategoryOut { name: c.name.clone(), questions: c.questions.clone() })
            .collect(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct ScoreIn {
    pub answers: Vec<f64>,
}

#[derive(Deserialize)]
pub struct EmailIn {
    pub to: String,
    pub answers: Vec<f64>,
    #[serde(default)]
    pub subject: Option<String>,
}
#[derive(Serialize)]
pub struct EmailOut {
    pub id: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    #[serde(rename = "emailEnabled")]
    pub email_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_messages_parse_from_tagged_json() {
        let m: ClientWsMessage = serde_json::from_value(json!({"type": "answer", "score": 4})).unwrap();
        assert!(matches!(m, ClientWsMessage::Answer { score } if score == 4.0));
        let m: ClientWsMessage = serde_json::from_value(json!({"type": "email_result", "to": "a@b.co"})).unwrap();
        assert!(matches!(m, ClientWsMessage::EmailResult { ref to, subject: None } if to == "a@b.co"));
        assert!(serde_json::from_value::<ClientWsMessage>(json!({"type": "teleport"})).is_err());
    }

    #[test]
    fn question_message_shape() {
        let m = ServerWsMessage::Question { index: 2, total: 16, text: "t".into(), current_answer: Some(4) };
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            json!({"type": "question", "index": 2, "total": 16, "text": "t", "currentAnswer": 4})
        );
    }

    #[test]
    fn assessment_out_hides_reverse_coding() {
        let a = Assessment::builtin().unwrap();
        let v = serde_json::to_value(to_out(&a)).unwrap();
        assert_eq!(v["questions"].as_array().unwrap().len(), 16);
        assert!(v["questions"][1].get("reverse_coded").is_none());
        assert_eq!(v["scale"][2]["label"], "Neutral / Unsure");
        assert_eq!(v["categories"][0]["name"], "Nourishment");
    }
}
