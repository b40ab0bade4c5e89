pub mod health;
pub mod submission_download;
pub mod submission_upload;
