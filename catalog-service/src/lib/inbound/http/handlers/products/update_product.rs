use axum::extract::FromRequest;
use axum::extract::Multipart;
use axum::extract::Path;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Deserializer;

use super::parse_product_id;
use super::ProductForm;
use crate::domain::category::models::CategoryId;
use crate::domain::product::errors::ProductError;
use crate::domain::product::models::Price;
use crate::domain::product::models::ProductName;
use crate::domain::product::models::UpdateProductCommand;
use crate::domain::product::ports::ProductServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Update a product from either a multipart form (which may carry extra
/// images) or a JSON body.
pub async fn update_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(product_id): Path<String>,
    request: Request,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    caller.require_admin()?;

    let id = parse_product_id(&product_id)?;

    let command = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|rejection| rejection_to_error(rejection.status(), rejection.body_text()))?;
        ProductForm::from_multipart(multipart)
            .await?
            .into_update_command()?
    } else {
        let Json(body) = Json::<UpdateProductRequest>::from_request(request, &state)
            .await
            .map_err(|rejection| rejection_to_error(rejection.status(), rejection.body_text()))?;
        body.try_into_command()?
    };

    state
        .product_service
        .update_product(&id, command)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("updated")))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn rejection_to_error(status: StatusCode, message: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("request body too large".to_string())
    } else {
        ApiError::BadRequest(message)
    }
}

/// JSON update body. Absent keys leave the field untouched; `null` clears
/// `description` and `category_id`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    description: Option<Option<String>>,
    #[serde(default)]
    price: Option<PriceInput>,
    #[serde(default)]
    in_stock: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    category_id: Option<Option<String>>,
}

/// Prices arrive as JSON numbers or as strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum PriceInput {
    Number(f64),
    Text(String),
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateProductRequest {
    fn try_into_command(self) -> Result<UpdateProductCommand, ProductError> {
        let price = match self.price {
            Some(PriceInput::Number(amount)) => Some(Price::from_f64(amount)?),
            Some(PriceInput::Text(text)) => Some(text.parse::<Price>()?),
            None => None,
        };

        let category_id = match self.category_id {
            Some(Some(raw)) => Some(Some(CategoryId::from_string(&raw)?)),
            Some(None) => Some(None),
            None => None,
        };

        Ok(UpdateProductCommand {
            name: self.name.map(ProductName::new).transpose()?,
            description: self.description,
            price,
            in_stock: self.in_stock,
            category_id,
            images: Vec::new(),
        })
    }
}
