//! Image and record storage

use crate::error::{AdminError, Result};
use crate::hotel::Hotel;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use bytes::Bytes;
use std::sync::{Mutex, PoisonError};

/// Bucket-addressed blob storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<()>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;
}

/// Hotel record persistence
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save(&self, hotel: &Hotel) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(aws_sdk_s3::primitives::ByteStream::from(body))
            .set_content_type(content_type.map(String::from))
            .send()
            .await
            .map_err(|e| {
                AdminError::Upstream(format!(
                    "Failed to upload s3://{bucket}/{key}: {}",
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AdminError::Upstream(format!(
                    "Failed to delete s3://{bucket}/{key}: {}",
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DynamoRecordStore {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoRecordStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn save(&self, hotel: &Hotel) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .item("UserId", AttributeValue::S(hotel.user_id.clone()))
            .item("HotelId", AttributeValue::S(hotel.hotel_id.clone()))
            .item("Name", AttributeValue::S(hotel.name.clone()))
            .item("Price", AttributeValue::N(hotel.price.to_string()))
            .item("Rating", AttributeValue::N(hotel.rating.to_string()))
            .item("CityName", AttributeValue::S(hotel.city_name.clone()))
            .item("FileName", AttributeValue::S(hotel.file_name.clone()))
            .send()
            .await
            .map_err(|e| {
                AdminError::Upstream(format!(
                    "Failed to save hotel {} to {}: {}",
                    hotel.hotel_id,
                    self.table,
                    aws_sdk_dynamodb::error::DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}

/// An object written to [`MemoryObjectStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
}

/// In-memory object store for tests
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<Vec<StoredObject>>,
    fail_with: Option<String>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects every put with an upstream error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(AdminError::Upstream(message.clone()));
        }
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StoredObject {
                bucket: bucket.to_string(),
                key: key.to_string(),
                body,
                content_type: content_type.map(String::from),
            });
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|o| o.bucket != bucket || o.key != key);
        Ok(())
    }
}

/// In-memory record store for tests
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<Hotel>>,
    fail_with: Option<String>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects every save with an upstream error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<Hotel> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn save(&self, hotel: &Hotel) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(AdminError::Upstream(message.clone()));
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hotel.clone());
        Ok(())
    }
}
