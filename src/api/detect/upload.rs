// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload extraction

use axum::extract::{FromRequest, Request};
use axum_extra::extract::Multipart;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::api::errors::ApiError;

/// Name of the multipart field carrying the road photo
pub const FILE_FIELD: &str = "file";

/// Read the `file` field from a multipart request
///
/// Returns `Ok(None)` when the request is not multipart or has no `file`
/// field. A present but empty field is returned as an empty payload so that
/// decoding reports it.
pub async fn read_file_field(request: Request) -> Result<Option<Bytes>, ApiError> {
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("Request is not a multipart upload: {}", rejection);
            return Ok(None);
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart body: {}", e);
        ApiError::InvalidRequest(format!("Malformed multipart body: {}", e))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let data = field.bytes().await.map_err(|e| {
            warn!("Failed to read uploaded file: {}", e);
            ApiError::InvalidRequest(format!("Failed to read uploaded file: {}", e))
        })?;

        debug!("Received upload: {} bytes", data.len());
        return Ok(Some(data));
    }

    Ok(None)
}
