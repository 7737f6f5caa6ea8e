//! Multipart uploads.

use crate::error::{SyncError, SyncResult};
use crate::notifications::messages;
use crate::shared::Shared;
use dovah_client::UploadFile;
use dovah_types::{NotificationLevel, UploadOptions, UploadResult};
use std::sync::Arc;
use tracing::{info, warn};

/// Sends file selections to the server and merges the results.
#[derive(Clone)]
pub struct UploadCoordinator {
    shared: Arc<Shared>,
}

impl UploadCoordinator {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Uploads every file in one submission.
    ///
    /// The server's records are put at the front of the file list in the
    /// order returned. An empty selection is refused before any request.
    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
        options: UploadOptions,
    ) -> SyncResult<UploadResult> {
        if files.is_empty() {
            self.shared.notify(&messages::EMPTY_UPLOAD).await;
            return Err(SyncError::EmptySelection);
        }

        let epoch = self.shared.epoch().await;
        let submitted = files.len();
        let result = match self.shared.api.upload(&self.shared.ctx, files, options).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Upload of {} file(s) failed: {}", submitted, e);
                self.shared.notify_in(epoch, &messages::UPLOAD_FAILED).await;
                return Err(e.into());
            }
        };

        {
            let mut state = self.shared.state.write().await;
            if state.epoch() != epoch {
                return Ok(result);
            }
            state.prepend_files(result.uploaded.clone());
        }
        info!("Uploaded {} file(s)", result.count);
        self.shared
            .notify_text(
                messages::UPLOAD_TITLE,
                format!("{} file(s) added successfully.", result.count),
                NotificationLevel::Success,
            )
            .await;
        Ok(result)
    }
}
