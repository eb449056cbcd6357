pub mod assemble;
pub mod blocks;
pub mod category;
pub mod required;
pub mod returns;
pub mod sections;
pub mod types;

use tracing::debug;

use crate::error::SchemaError;
use crate::schema::SchemaDocument;
use crate::settings::Settings;
use returns::ReturnExtractor;

/// HTML → blocks → sections → schema. Nothing is written until every section parsed.
pub fn extract_schema(html: &str, settings: &Settings) -> Result<SchemaDocument, SchemaError> {
    let blocks = blocks::classify_document(html, &settings.table_selector)?;
    let sections = sections::cluster_sections(&blocks, settings.heading_level);
    debug!(blocks = blocks.len(), sections = sections.len(), "Segmented documentation");
    assemble::assemble(&sections, &ReturnExtractor::default(), settings)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Category, Primitive, TypeAlt};

    fn fixture() -> SchemaDocument {
        let html = std::fs::read_to_string("tests/fixtures/bot_api.html").unwrap();
        extract_schema(&html, &Settings::default()).unwrap()
    }

    #[test]
    fn fixture_objects() {
        let schema = fixture();
        let names: Vec<&str> = schema.objects.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            [
                "User",
                "Chat",
                "Message",
                "PhotoSize",
                "ForumTopicClosed",
                "InputMediaPhoto",
                "InputMediaVideo",
                "InlineQueryResultArticle",
                "InputTextMessageContent",
                "InputFile",
            ]
        );

        let message = &schema.objects["Message"];
        assert_eq!(message.category, Category::AbstractObject);
        assert_eq!(message.documentation_link, "https://core.telegram.org/bots/api#message");
        assert!(message.description.contains("This object represents a message."));

        let photo = message.fields.iter().find(|f| f.name == "photo").unwrap();
        assert_eq!(photo.type_ref.alternatives(), &[TypeAlt::reference("PhotoSize").into_collection()]);
        assert!(!photo.required);

        let chat = message.fields.iter().find(|f| f.name == "chat").unwrap();
        assert!(chat.required);

        assert_eq!(
            schema.objects["InlineQueryResultArticle"].category,
            Category::AbstractInlineQueryResult
        );
        assert_eq!(
            schema.objects["InputTextMessageContent"].category,
            Category::AbstractInputMessageContent
        );
        assert!(schema.objects["ForumTopicClosed"].fields.is_empty());
    }

    #[test]
    fn fixture_methods() {
        let schema = fixture();
        let names: Vec<&str> = schema.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            ["getMe", "sendMessage", "sendPhoto", "sendMediaGroup", "editMessageText", "getChatAdministrators", "answerInlineQuery"]
        );

        let method = |name: &str| schema.methods.iter().find(|m| m.name == name).unwrap();

        assert_eq!(method("getMe").return_type.alternatives(), &[TypeAlt::reference("User")]);
        assert!(method("getMe").parameters.is_empty());

        let send = method("sendMessage");
        assert_eq!(send.return_type.alternatives(), &[TypeAlt::reference("Message")]);
        assert_eq!(send.parameters[0].type_ref.alternatives(), &[TypeAlt::primitive(Primitive::String)]);
        assert!(send.parameters[0].required);

        let photo = method("sendPhoto");
        assert_eq!(
            photo.parameters[1].type_ref.alternatives(),
            &[TypeAlt::reference("InputFileInterface"), TypeAlt::primitive(Primitive::String)]
        );

        let group = method("sendMediaGroup");
        assert_eq!(group.return_type.alternatives(), &[TypeAlt::reference("Message").into_collection()]);
        assert_eq!(
            group.parameters[1].type_ref.alternatives(),
            &[
                TypeAlt::reference("InputMediaPhoto").into_collection(),
                TypeAlt::reference("InputMediaVideo").into_collection(),
            ]
        );

        assert_eq!(
            method("editMessageText").return_type.alternatives(),
            &[TypeAlt::reference("Message"), TypeAlt::primitive(Primitive::Bool)]
        );
        let edit = method("editMessageText");
        let chat_id = edit.parameters.iter().find(|p| p.name == "chat_id").unwrap();
        assert!(chat_id.required);

        assert_eq!(
            method("getChatAdministrators").return_type.alternatives(),
            &[TypeAlt::reference("User").into_collection()]
        );

        let answer = method("answerInlineQuery");
        assert_eq!(answer.return_type.alternatives(), &[TypeAlt::primitive(Primitive::Bool)]);
        assert_eq!(
            answer.parameters[1].type_ref.alternatives(),
            &[TypeAlt::reference("AbstractInlineQueryResult").into_collection()]
        );
    }

    #[test]
    fn extraction_is_byte_stable() {
        let first = fixture().to_json().unwrap();
        let second = fixture().to_json().unwrap();
        assert_eq!(first, second);
        assert!(first.contains("«Hello»"));
    }

    #[test]
    fn unknown_type_aborts_run() {
        let html = r##"<html><body><div>
            <h4><a class="anchor" name="message" href="#message"></a>Message</h4>
            <table class="table"><thead><tr><th>Field</th><th>Type</th><th>Description</th></tr></thead>
            <tbody><tr><td>widget</td><td>Widget</td><td>Unknown</td></tr></tbody></table>
            </div></body></html>"##;
        let err = extract_schema(html, &Settings::default()).unwrap_err();
        assert!(matches!(err.root(), SchemaError::UnexpectedType { text } if text == "Widget"));
    }
}
