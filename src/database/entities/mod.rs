pub mod upload_history;

pub use upload_history::Entity as UploadHistory;
