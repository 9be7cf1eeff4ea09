//! Multipart add-hotel form

use crate::error::{AdminError, Result};
use bytes::Bytes;
use multer::Multipart;

/// Image part of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelForm {
    pub hotel_name: String,
    pub hotel_rating: i32,
    pub hotel_city: String,
    pub hotel_price: i32,
    pub user_id: Option<String>,
    /// Token sent by clients that cannot set an `Authorization` header
    pub id_token: Option<String>,
    pub image: ImageUpload,
}

#[derive(Default)]
struct FormBuilder {
    hotel_name: Option<String>,
    hotel_rating: Option<String>,
    hotel_city: Option<String>,
    hotel_price: Option<String>,
    user_id: Option<String>,
    id_token: Option<String>,
    image: Option<ImageUpload>,
}

impl FormBuilder {
    fn set_text(&mut self, name: &str, value: String) {
        let value = value.trim().to_string();
        if value.is_empty() {
            return;
        }
        let slot = match name {
            "hotelName" => &mut self.hotel_name,
            "hotelRating" => &mut self.hotel_rating,
            "hotelCity" => &mut self.hotel_city,
            "hotelPrice" => &mut self.hotel_price,
            "userId" => &mut self.user_id,
            "idToken" => &mut self.id_token,
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
                return;
            }
        };
        *slot = Some(value);
    }

    fn build(self) -> Result<HotelForm> {
        Ok(HotelForm {
            hotel_name: required(self.hotel_name, "hotelName")?,
            hotel_rating: integer(self.hotel_rating, "hotelRating")?,
            hotel_city: required(self.hotel_city, "hotelCity")?,
            hotel_price: integer(self.hotel_price, "hotelPrice")?,
            user_id: self.user_id,
            id_token: self.id_token,
            image: self
                .image
                .ok_or_else(|| AdminError::BadRequest("Form has no image file".to_string()))?,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value.ok_or_else(|| AdminError::BadRequest(format!("Missing form field '{field}'")))
}

fn integer(value: Option<String>, field: &str) -> Result<i32> {
    let raw = required(value, field)?;
    raw.parse()
        .map_err(|_| AdminError::BadRequest(format!("Form field '{field}' must be an integer, got '{raw}'")))
}

/// Keep only the last path segment of a client-supplied file name
fn sanitize_file_name(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    (!name.is_empty() && name != "." && name != "..").then(|| name.to_string())
}

/// Parse a `multipart/form-data` body.
///
/// The first part carrying a file name is the image; later file parts are
/// ignored.
pub async fn parse_form(content_type: &str, body: Bytes) -> Result<HotelForm> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| AdminError::BadRequest(format!("Expected a multipart/form-data body: {e}")))?;

    let stream = futures_util::stream::once(async move { Ok::<_, std::convert::Infallible>(body) });
    let mut multipart = Multipart::new(stream, boundary);
    let mut builder = FormBuilder::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name() {
            let file_name = sanitize_file_name(file_name)
                .ok_or_else(|| AdminError::BadRequest("Image file name is empty".to_string()))?;
            let content_type = field.content_type().map(|m| m.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AdminError::BadRequest(format!("Failed to read image: {e}")))?;

            if builder.image.is_none() {
                builder.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AdminError::BadRequest(format!("Failed to read field '{name}': {e}")))?;
        builder.set_text(&name, value);
    }

    builder.build()
}
