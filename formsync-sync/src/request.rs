//! Remote mutation requests, shaped as Google Forms `batchUpdate` requests.
//!
//! Each [`Request`] serializes to a single-key object, e.g.
//! `{"createItem": {"item": {...}, "location": {"index": 0}}}`.

use serde::Serialize;

/// One mutation inside a batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    UpdateFormInfo(UpdateFormInfo),
    CreateItem(CreateItem),
    DeleteItem(DeleteItem),
    UpdateSettings(UpdateSettings),
}

impl Request {
    /// Set only the description.
    pub fn set_description(description: &str) -> Self {
        Request::UpdateFormInfo(UpdateFormInfo {
            info: Info {
                title: None,
                description: Some(description.to_string()),
            },
            update_mask: "description".to_string(),
        })
    }

    /// Replace title and description together.
    pub fn set_title_and_description(title: &str, description: &str) -> Self {
        Request::UpdateFormInfo(UpdateFormInfo {
            info: Info {
                title: Some(title.to_string()),
                description: Some(description.to_string()),
            },
            update_mask: "title,description".to_string(),
        })
    }

    pub fn create_item(item: Item, index: usize) -> Self {
        Request::CreateItem(CreateItem {
            item,
            location: Location { index },
        })
    }

    pub fn delete_item(index: usize) -> Self {
        Request::DeleteItem(DeleteItem {
            location: Location { index },
        })
    }

    /// Turn quiz mode off.
    pub fn disable_quiz() -> Self {
        Request::UpdateSettings(UpdateSettings {
            settings: FormSettings {
                quiz_settings: QuizSettings { is_quiz: false },
            },
            update_mask: "quizSettings".to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormInfo {
    pub info: Info,
    pub update_mask: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateItem {
    pub item: Item,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteItem {
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    pub settings: FormSettings,
    pub update_mask: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    pub quiz_settings: QuizSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    pub is_quiz: bool,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A question item as the remote service models it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub title: String,
    pub question_item: QuestionItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionItem {
    pub question: Question,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub required: bool,
    #[serde(flatten)]
    pub body: QuestionBody,
}

/// Exactly one answer block per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionBody {
    TextQuestion {
        paragraph: bool,
    },
    ChoiceQuestion {
        #[serde(rename = "type")]
        kind: ChoiceType,
        options: Vec<ChoiceOption>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChoiceType {
    /// Single selection.
    Radio,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: String,
}
