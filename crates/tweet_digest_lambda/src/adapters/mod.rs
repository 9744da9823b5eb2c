pub mod notify;
pub mod oauth;
pub mod object_store;
pub mod timeline;
