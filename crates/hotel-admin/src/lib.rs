//! Add-hotel endpoint for the hotel admin panel
//!
//! Accepts a multipart form with the hotel's details and image, checks that
//! the caller belongs to the admin group, uploads the image and saves the
//! hotel record.

mod config;
mod error;
mod form;
mod handler;
mod hotel;
mod response;
mod storage;

pub use config::{AdminConfig, AdminConfigKeys};
pub use error::{AdminError, Result};
pub use form::{HotelForm, ImageUpload, parse_form};
pub use handler::AdminService;
pub use hotel::Hotel;
pub use storage::{
    DynamoRecordStore, MemoryObjectStore, MemoryRecordStore, ObjectStore, RecordStore,
    S3ObjectStore, StoredObject,
};
