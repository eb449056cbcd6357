use crate::error::SchemaError;
use crate::schema::Category;

/// Pick the base type for an object from its name. First matching rule wins.
pub fn resolve(name: &str) -> Result<Category, SchemaError> {
    if name.starts_with("InlineQueryResult") {
        return Ok(Category::AbstractInlineQueryResult);
    }
    if name.starts_with("Input") && name.contains("MessageContent") {
        return Ok(Category::AbstractInputMessageContent);
    }
    if name.chars().next().is_some_and(char::is_uppercase) {
        return Ok(Category::AbstractObject);
    }
    Err(SchemaError::UnresolvableCategory {
        name: name.to_string(),
    })
}
