//! Add-hotel request handling

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::form::{HotelForm, parse_form};
use crate::hotel::Hotel;
use crate::response;
use crate::storage::{ObjectStore, RecordStore};
use bytes::Bytes;
use hotel_auth::{Authorizer, SecretStore, authorization_header, extract_bearer_token, require_group};
use lambda_http::http::header::CONTENT_TYPE;
use lambda_http::http::{Method, StatusCode};
use lambda_http::{Body, Request, Response};
use uuid::Uuid;

/// Add-hotel endpoint with its collaborators
pub struct AdminService<S, O, R> {
    authorizer: Authorizer<S>,
    objects: O,
    records: R,
    image_bucket: String,
    admin_group: String,
}

impl<S, O, R> AdminService<S, O, R>
where
    S: SecretStore,
    O: ObjectStore,
    R: RecordStore,
{
    pub fn new(config: AdminConfig, secrets: S, objects: O, records: R) -> Self {
        Self {
            authorizer: Authorizer::new(config.auth, secrets),
            objects,
            records,
            image_bucket: config.image_bucket,
            admin_group: config.admin_group,
        }
    }

    pub fn objects(&self) -> &O {
        &self.objects
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    /// Handle one HTTP request. Every outcome is a response with CORS headers.
    pub async fn handle(&self, request: Request) -> Response<Body> {
        if request.method() == Method::OPTIONS {
            return response::preflight();
        }

        match self.add_hotel(&request).await {
            Ok(hotel) => response::json(StatusCode::OK, &hotel),
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    tracing::error!(error = %e, "Add hotel failed");
                } else {
                    tracing::warn!(status = status.as_u16(), error = %e, "Add hotel rejected");
                }
                response::error(&e)
            }
        }
    }

    /// Verify the caller, then store the image and the hotel record.
    ///
    /// Authorization is decided before form errors are reported, so an
    /// anonymous caller learns nothing about the expected form.
    pub async fn add_hotel(&self, request: &Request) -> Result<Hotel> {
        let header_token = authorization_header(
            request
                .headers()
                .iter()
                .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
        )
        .and_then(extract_bearer_token)
        .map(String::from);

        let form = match request.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
            Some(content_type) => parse_form(content_type, body_bytes(request.body())).await,
            None => Err(AdminError::BadRequest("Missing Content-Type header".to_string())),
        };

        let token = header_token
            .or_else(|| form.as_ref().ok().and_then(|f| f.id_token.clone()))
            .ok_or_else(|| AdminError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = self.authorizer.verify(&token).await?;
        if !require_group(&claims, &self.admin_group).is_allowed() {
            return Err(AdminError::admin_required(&self.admin_group));
        }

        let form = form?;
        let user_id = form
            .user_id
            .clone()
            .or_else(|| claims.subject.clone())
            .ok_or_else(|| AdminError::BadRequest("Missing form field 'userId'".to_string()))?;

        self.store(user_id, form).await
    }

    async fn store(&self, user_id: String, form: HotelForm) -> Result<Hotel> {
        let hotel = Hotel::new(Uuid::new_v4(), user_id, &form);
        let key = hotel.object_key();

        self.objects
            .put(
                &self.image_bucket,
                &key,
                form.image.bytes,
                form.image.content_type.as_deref(),
            )
            .await?;
        if let Err(e) = self.records.save(&hotel).await {
            // The record is the only reference to the image
            if let Err(cleanup) = self.objects.delete(&self.image_bucket, &key).await {
                tracing::error!(
                    bucket = %self.image_bucket,
                    key = %key,
                    error = %cleanup,
                    "Failed to remove image after record save failed"
                );
            }
            return Err(e);
        }

        tracing::info!(
            hotel_id = %hotel.hotel_id,
            user_id = %hotel.user_id,
            bucket = %self.image_bucket,
            key = %key,
            "Hotel added"
        );
        Ok(hotel)
    }
}

fn body_bytes(body: &Body) -> Bytes {
    match body {
        Body::Empty => Bytes::new(),
        Body::Text(text) => Bytes::copy_from_slice(text.as_bytes()),
        Body::Binary(bytes) => Bytes::copy_from_slice(bytes),
    }
}
