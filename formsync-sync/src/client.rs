//! The remote forms service, as seen by the synchronizer.

use serde::Deserialize;
use serde_json::Value;

use crate::request::Request;

pub use crate::error::RemoteError;

/// Edit URL of a remote form.
pub fn edit_url(form_id: &str) -> String {
    format!("https://docs.google.com/forms/d/{form_id}/edit")
}

/// Operations the synchronizer needs from the remote service.
///
/// Calls are blocking and issued one at a time.
pub trait FormsClient {
    /// Create an empty form titled `title`; returns the remote form id.
    fn create(&mut self, title: &str) -> Result<String, RemoteError>;

    /// Fetch the current state of a form.
    fn get(&mut self, form_id: &str) -> Result<RemoteForm, RemoteError>;

    /// Apply `requests` in order, atomically on the remote side.
    fn batch_update(&mut self, form_id: &str, requests: &[Request]) -> Result<(), RemoteError>;
}

impl<C: FormsClient + ?Sized> FormsClient for &mut C {
    fn create(&mut self, title: &str) -> Result<String, RemoteError> {
        (**self).create(title)
    }

    fn get(&mut self, form_id: &str) -> Result<RemoteForm, RemoteError> {
        (**self).get(form_id)
    }

    fn batch_update(&mut self, form_id: &str, requests: &[Request]) -> Result<(), RemoteError> {
        (**self).batch_update(form_id, requests)
    }
}

/// Client for passes that must not reach the service: dry runs and passes
/// where every form is already current. Any call is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl FormsClient for Offline {
    fn create(&mut self, _title: &str) -> Result<String, RemoteError> {
        Err(offline())
    }

    fn get(&mut self, _form_id: &str) -> Result<RemoteForm, RemoteError> {
        Err(offline())
    }

    fn batch_update(&mut self, _form_id: &str, _requests: &[Request]) -> Result<(), RemoteError> {
        Err(offline())
    }
}

fn offline() -> RemoteError {
    RemoteError::Transport("remote calls are disabled for this pass".to_string())
}

/// Remote form state; only what the update path needs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteForm {
    #[serde(default)]
    pub form_id: String,
    #[serde(default)]
    pub items: Vec<RemoteItem>,
}

/// One item of a remote form. Non-question items (text blocks, images, page
/// breaks) have no `questionItem`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItem {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub question_item: Option<Value>,
}

impl RemoteItem {
    pub fn has_question(&self) -> bool {
        self.question_item.is_some()
    }
}

impl RemoteForm {
    /// Indices of question-bearing items, highest first.
    ///
    /// Deleting in this order keeps every remaining index valid.
    pub fn question_indices_descending(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.has_question())
            .map(|(index, _)| index)
            .collect();
        indices.reverse();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_remote_form_and_finds_question_items() {
        let form: RemoteForm = serde_json::from_str(
            r#"{
                "formId": "abc",
                "info": {"title": "T"},
                "items": [
                    {"itemId": "1", "questionItem": {"question": {}}},
                    {"itemId": "2", "textItem": {}},
                    {"itemId": "3", "questionItem": {"question": {}}},
                    {"itemId": "4", "questionItem": {"question": {}}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(form.form_id, "abc");
        assert_eq!(form.question_indices_descending(), vec![3, 2, 0]);
    }

    #[test]
    fn form_without_items() {
        let form: RemoteForm = serde_json::from_str(r#"{"formId": "abc"}"#).unwrap();
        assert!(form.question_indices_descending().is_empty());
    }

    #[test]
    fn offline_client_refuses_calls() {
        let mut client = Offline;
        assert!(matches!(client.create("t"), Err(RemoteError::Transport(_))));
        assert!(client.batch_update("f", &[]).is_err());
    }

    #[test]
    fn edit_url_embeds_form_id() {
        assert_eq!(edit_url("xyz"), "https://docs.google.com/forms/d/xyz/edit");
    }
}
