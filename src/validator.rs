//! JSON body extraction with field validation.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use pagecraft_core::AppError;

/// Flattens field errors into `"email is invalid, password is invalid"`.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// The 422 answered for a payload that fails [`Validate`].
pub fn validation_error(errors: &ValidationErrors) -> AppError {
    AppError::unprocessable(anyhow!("Validation error: {}", format_errors(errors)))
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let body = rejection.body_text();

    if let Some(field) = body
        .split("missing field `")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
    {
        return AppError::bad_request(anyhow!("{field} is required"));
    }

    if body.contains("unknown variant") {
        return AppError::unprocessable(anyhow!("Invalid value in request: {body}"));
    }

    if body.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

/// Like [`Json`], but runs [`Validate`] and answers 422 on failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate().map_err(|errors| validation_error(&errors))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8))]
        password: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let req = json_request(r#"{"email":"a@x.com","password":"pw123456"}"#);
        let ValidatedJson(body) = ValidatedJson::<Signup>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(body.email, "a@x.com");
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let req = json_request(r#"{"email":"a@x.com"}"#);
        let err = ValidatedJson::<Signup>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error.to_string(), "password is required");
    }

    #[tokio::test]
    async fn invalid_fields_are_unprocessable() {
        let req = json_request(r#"{"email":"nope","password":"short"}"#);
        let err = ValidatedJson::<Signup>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let message = err.error.to_string();
        assert!(message.contains("email is invalid"), "{message}");
        assert!(message.contains("password is invalid"), "{message}");
    }

    #[tokio::test]
    async fn missing_content_type_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();
        let err = ValidatedJson::<Signup>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
