pub mod explain_api;
