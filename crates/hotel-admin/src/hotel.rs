use crate::form::HotelForm;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored hotel listing, keyed by `(UserId, HotelId)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Hotel {
    pub user_id: String,
    pub hotel_id: String,
    pub name: String,
    pub price: i32,
    pub rating: i32,
    pub city_name: String,
    pub file_name: String,
}

impl Hotel {
    pub fn new(hotel_id: Uuid, user_id: String, form: &HotelForm) -> Self {
        Self {
            user_id,
            hotel_id: hotel_id.to_string(),
            name: form.hotel_name.clone(),
            price: form.hotel_price,
            rating: form.hotel_rating,
            city_name: form.hotel_city.clone(),
            file_name: form.image.file_name.clone(),
        }
    }

    /// Key of the hotel's image in the bucket
    pub fn object_key(&self) -> String {
        format!("{}/{}", self.hotel_id, self.file_name)
    }
}
