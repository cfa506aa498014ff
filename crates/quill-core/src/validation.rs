//! Schema checks for incoming post, category and comment payloads.
//!
//! Payloads arrive as raw JSON so type errors can be reported per field.
//! Fields are checked in schema order and the first failure wins; keys the
//! schema does not know are rejected after all known fields pass.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{CategoryDraft, PostDraft, PostStatus};
use crate::error::ValidationError;

pub const TITLE_MAX_CHARS: usize = 200;
pub const CATEGORY_NAME_MAX_CHARS: usize = 50;
pub const CATEGORY_DESCRIPTION_MAX_CHARS: usize = 200;

const POST_FIELDS: [&str; 7] = [
    "title",
    "content",
    "author",
    "category",
    "featuredImage",
    "status",
    "tags",
];
const CATEGORY_FIELDS: [&str; 2] = ["name", "description"];

type Result<T> = std::result::Result<T, ValidationError>;

/// Validate a create/update post payload.
pub fn validate_post(payload: &Value) -> Result<PostDraft> {
    let fields = as_object(payload)?;

    let title = required_string(fields, "title", Some(TITLE_MAX_CHARS))?;
    let content = required_string(fields, "content", None)?;
    let author = required_string(fields, "author", None)?;
    let category = required_string(fields, "category", None)?;
    let category_id = Uuid::parse_str(&category)
        .map_err(|_| ValidationError::new("category", "\"category\" must be a valid GUID"))?;
    let featured_image = featured_image(fields)?;
    let status = status(fields)?;
    let tags = tags(fields)?;
    reject_unknown(fields, &POST_FIELDS)?;

    Ok(PostDraft {
        title,
        content,
        author,
        category_id,
        featured_image,
        status,
        tags,
    })
}

/// Validate a create category payload.
pub fn validate_category(payload: &Value) -> Result<CategoryDraft> {
    let fields = as_object(payload)?;

    let name = required_string(fields, "name", Some(CATEGORY_NAME_MAX_CHARS))?;
    let description = match fields.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(string_within(value, "description", CATEGORY_DESCRIPTION_MAX_CHARS)?),
    };
    reject_unknown(fields, &CATEGORY_FIELDS)?;

    Ok(CategoryDraft { name, description })
}

/// Check the two comment fields; both must be non-empty.
pub fn validate_comment(author: &str, content: &str) -> Result<()> {
    if author.is_empty() || content.is_empty() {
        let field = if author.is_empty() { "author" } else { "content" };
        return Err(ValidationError::new(
            field,
            "Author and content are required",
        ));
    }
    Ok(())
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| ValidationError::new("value", "\"value\" must be of type object"))
}

fn required_string(
    fields: &Map<String, Value>,
    field: &str,
    max_chars: Option<usize>,
) -> Result<String> {
    let value = match fields.get(field) {
        None => {
            return Err(ValidationError::new(
                field,
                format!("\"{field}\" is required"),
            ));
        }
        Some(value) => value,
    };

    let text = expect_string(value, field)?;
    if text.is_empty() {
        return Err(ValidationError::new(
            field,
            format!("\"{field}\" is not allowed to be empty"),
        ));
    }

    match max_chars {
        Some(max) => string_within(value, field, max),
        None => Ok(text.to_string()),
    }
}

fn expect_string<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ValidationError::new(field, format!("\"{field}\" must be a string")))
}

fn string_within(value: &Value, field: &str, max_chars: usize) -> Result<String> {
    let text = expect_string(value, field)?;
    if text.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("\"{field}\" length must be less than or equal to {max_chars} characters long"),
        ));
    }
    Ok(text.to_string())
}

fn featured_image(fields: &Map<String, Value>) -> Result<Option<String>> {
    let value = match fields.get("featuredImage") {
        None => return Ok(None),
        Some(Value::Null) => return Ok(Some(String::new())),
        Some(value) => expect_string(value, "featuredImage")?,
    };

    if value.is_empty() {
        return Ok(Some(String::new()));
    }

    url::Url::parse(value).map_err(|_| {
        ValidationError::new("featuredImage", "\"featuredImage\" must be a valid uri")
    })?;
    Ok(Some(value.to_string()))
}

fn status(fields: &Map<String, Value>) -> Result<Option<PostStatus>> {
    let Some(value) = fields.get("status") else {
        return Ok(None);
    };

    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .map(Some)
        .ok_or_else(|| {
            let allowed: Vec<_> = PostStatus::ALL.iter().map(PostStatus::as_str).collect();
            ValidationError::new(
                "status",
                format!("\"status\" must be one of [{}]", allowed.join(", ")),
            )
        })
}

fn tags(fields: &Map<String, Value>) -> Result<Option<Vec<String>>> {
    let Some(value) = fields.get("tags") else {
        return Ok(None);
    };

    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::new("tags", "\"tags\" must be an array"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let field = format!("tags[{i}]");
            let tag = expect_string(item, &field)?;
            if tag.is_empty() {
                let message = format!("\"{field}\" is not allowed to be empty");
                return Err(ValidationError::new(field, message));
            }
            Ok(tag.to_string())
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn reject_unknown(fields: &Map<String, Value>, known: &[&str]) -> Result<()> {
    match fields.keys().find(|key| !known.contains(&key.as_str())) {
        Some(key) => Err(ValidationError::new(
            key.as_str(),
            format!("\"{key}\" is not allowed"),
        )),
        None => Ok(()),
    }
}
