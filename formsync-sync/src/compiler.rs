//! Question compiler: [`QuestionSpec`] → remote [`Item`].

use formsync_core::{ConfigError, FormSpec, QuestionKind, QuestionSpec};

use crate::request::{
    ChoiceOption, ChoiceType, Item, Question, QuestionBody, QuestionItem, Request,
};

/// Compile one question into the remote item placed at `position`.
///
/// Fails with [`ConfigError`] for an unsupported `type` or a
/// `multiple_choice` question without options; never emits an item that
/// lacks an answer block.
pub fn compile(question: &QuestionSpec, position: usize) -> Result<Item, ConfigError> {
    let body = match &question.kind {
        QuestionKind::ShortAnswer => QuestionBody::TextQuestion { paragraph: false },
        QuestionKind::Paragraph => QuestionBody::TextQuestion { paragraph: true },
        QuestionKind::MultipleChoice => {
            let options = question
                .options
                .as_deref()
                .filter(|opts| !opts.is_empty())
                .ok_or(ConfigError::MissingOptions { position })?;
            QuestionBody::ChoiceQuestion {
                kind: ChoiceType::Radio,
                options: options
                    .iter()
                    .map(|value| ChoiceOption {
                        value: value.clone(),
                    })
                    .collect(),
            }
        }
        QuestionKind::Unsupported(kind) => {
            return Err(ConfigError::UnsupportedQuestionType {
                position,
                kind: kind.clone(),
            })
        }
    };

    Ok(Item {
        title: question.text.clone(),
        question_item: QuestionItem {
            question: Question {
                required: question.is_required(),
                body,
            },
        },
    })
}

/// `createItem` requests for every question of `spec`, at indices 0..N-1.
///
/// All questions are compiled before anything is returned, so a bad question
/// anywhere in the form fails the whole form up front.
pub fn compile_items(spec: &FormSpec) -> Result<Vec<Request>, ConfigError> {
    spec.questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            compile(question, index).map(|item| Request::create_item(item, index))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsync_core::FormId;
    use rstest::rstest;

    fn question(kind: &str, options: Option<Vec<&str>>) -> QuestionSpec {
        QuestionSpec {
            text: "Q".to_string(),
            kind: QuestionKind::from(kind),
            required: None,
            options: options.map(|o| o.into_iter().map(String::from).collect()),
        }
    }

    #[rstest]
    #[case("short_answer", false)]
    #[case("paragraph", true)]
    fn text_questions(#[case] kind: &str, #[case] paragraph: bool) {
        let item = compile(&question(kind, None), 0).unwrap();
        assert_eq!(
            item.question_item.question.body,
            QuestionBody::TextQuestion { paragraph }
        );
        assert!(!item.question_item.question.required);
    }

    #[test]
    fn options_on_text_questions_are_ignored() {
        let item = compile(&question("short_answer", Some(vec!["x"])), 0).unwrap();
        assert_eq!(
            item.question_item.question.body,
            QuestionBody::TextQuestion { paragraph: false }
        );
    }

    #[test]
    fn multiple_choice_keeps_option_order() {
        let mut q = question("multiple_choice", Some(vec!["b", "a", "c"]));
        q.required = Some(true);
        let item = compile(&q, 2).unwrap();
        assert_eq!(item.title, "Q");
        assert!(item.question_item.question.required);
        let QuestionBody::ChoiceQuestion { kind, options } = item.question_item.question.body
        else {
            panic!("expected a choice question");
        };
        assert_eq!(kind, ChoiceType::Radio);
        let values: Vec<_> = options.into_iter().map(|o| o.value).collect();
        assert_eq!(values, ["b", "a", "c"]);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(vec![]))]
    fn multiple_choice_without_options_is_a_config_error(#[case] options: Option<Vec<&str>>) {
        let err = compile(&question("multiple_choice", options), 4).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOptions { position: 4 }), "got: {err}");
    }

    #[test]
    fn unsupported_type_is_a_config_error() {
        let err = compile(&question("ranking", None), 1).unwrap_err();
        match err {
            ConfigError::UnsupportedQuestionType { position, kind } => {
                assert_eq!(position, 1);
                assert_eq!(kind, "ranking");
            }
            other => panic!("expected unsupported type, got {other:?}"),
        }
    }

    #[test]
    fn compile_items_assigns_ascending_indices() {
        let spec = FormSpec {
            id: FormId::from("f"),
            title: "F".to_string(),
            description: String::new(),
            questions: vec![question("short_answer", None), question("paragraph", None)],
        };
        let requests = compile_items(&spec).unwrap();
        let indices: Vec<_> = requests
            .iter()
            .map(|r| match r {
                Request::CreateItem(c) => c.location.index,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(indices, [0, 1]);
    }

    #[test]
    fn compile_items_fails_on_any_bad_question() {
        let spec = FormSpec {
            id: FormId::from("f"),
            title: "F".to_string(),
            description: String::new(),
            questions: vec![question("short_answer", None), question("ranking", None)],
        };
        assert!(compile_items(&spec).is_err());
    }
}
